//! Exports login credentials as CSV so an administrator can hand them out.

use crate::models::{Credential, Role};
use crate::store::AttendanceStore;
use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use log::info;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which credentials to include in an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RoleFilter {
    #[default]
    All,
    Admin,
    Faculty,
    Student,
}

impl RoleFilter {
    pub fn matches(self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Admin => role == Role::Admin,
            RoleFilter::Faculty => role == Role::Faculty,
            RoleFilter::Student => role == Role::Student,
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleFilter::All => f.write_str("all"),
            RoleFilter::Admin => f.write_str("admin"),
            RoleFilter::Faculty => f.write_str("faculty"),
            RoleFilter::Student => f.write_str("student"),
        }
    }
}

/// Writes a `Name,Email,Password,Role` table with one row per credential that passes `filter`.
///
/// Returns the number of rows written, not counting the header.
pub fn export_credentials<W: io::Write>(
    credentials: &[Credential],
    filter: RoleFilter,
    writer: W,
) -> csv::Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Name", "Email", "Password", "Role"])?;

    let mut rows = 0;
    for credential in credentials.iter().filter(|c| filter.matches(c.role())) {
        let role = credential.role().to_string();
        csv.write_record([
            credential.name.as_str(),
            credential.email.as_str(),
            credential.password.as_str(),
            role.as_str(),
        ])?;
        rows += 1;
    }

    csv.flush()?;

    Ok(rows)
}

/// The file name an export taken on `date` is saved under.
pub fn export_file_name(filter: RoleFilter, date: NaiveDate) -> String {
    format!("login-credentials-{filter}-{}.csv", date.format("%Y-%m-%d"))
}

/// Exports the store's credentials into `dir`, creating it if needed, and returns the new file.
pub fn export_to_dir(
    store: &AttendanceStore,
    filter: RoleFilter,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(filter, date));
    let file = fs::File::create(&path)?;
    let rows = export_credentials(&store.credentials(), filter, file)?;
    info!("Exported {rows} credentials to {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exports_only_matching_roles() {
        let store = AttendanceStore::seeded();
        let mut out = Vec::new();

        let rows = export_credentials(&store.credentials(), RoleFilter::Admin, &mut out).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name,Email,Password,Role\nDr. Admin,admin@college.com,admin123,Admin\n"
        );
    }

    #[test]
    fn all_filter_keeps_every_credential() {
        let store = AttendanceStore::seeded();
        let rows = export_credentials(&store.credentials(), RoleFilter::All, io::sink()).unwrap();
        assert_eq!(rows, 15);

        let rows =
            export_credentials(&store.credentials(), RoleFilter::Faculty, io::sink()).unwrap();
        assert_eq!(rows, 4);
    }

    #[test]
    fn file_name_carries_filter_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            export_file_name(RoleFilter::Student, date),
            "login-credentials-student-2025-03-07.csv"
        );
    }

    #[test]
    fn export_to_dir_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttendanceStore::seeded();
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();

        let out = dir.path().join("out");
        let path = export_to_dir(&store, RoleFilter::Student, &out, date).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 11);
        assert!(contents.contains("Alice Kumar,alice@demo.com,alice123,Student"));
    }
}
