//! Argument parsing for `edutrack`: the [`Cli`] flags the binary starts with, and the grammar of
//! each [`Command`] typed into its shell.

use crate::export::RoleFilter;
use crate::models::{Branch, FacultyUpdate, Position, Status, StudentUpdate, Year};
use crate::stats::AttendanceFilter;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Start-up options: where settings and data come from, and where commands are read.
#[derive(Parser, Debug)]
#[command(name = "edutrack", version, about = "Attendance tracking for admins, faculty, and students")]
pub struct Cli {
    /// The configuration file to read, without its extension.
    #[arg(long, default_value = "config")]
    pub config: String,

    /// A JSON dataset to start from, instead of the configured one or the demo institution.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Read shell commands from this file instead of standard input.
    #[arg(long)]
    pub script: Option<PathBuf>,
}

/// A single line typed into the shell.
#[derive(Parser, Debug)]
#[command(name = "edutrack", no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Log in with an email and password.
    Login { email: String, password: String },

    /// Log out of the current session.
    Logout,

    /// Show who is logged in.
    Whoami,

    /// Show the dashboard for the logged-in user.
    Dashboard,

    /// List students, optionally filtered.
    Students {
        #[arg(long)]
        branch: Option<Branch>,

        /// Matches name, roll number, or email.
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a new student to the roster.
    AddStudent(NewStudent),

    /// Change some of a student's details.
    UpdateStudent {
        id: String,

        #[command(flatten)]
        changes: StudentChanges,
    },

    /// Remove a student and their attendance records.
    DeleteStudent { id: String },

    /// List teaching faculty, optionally filtered.
    Faculty {
        #[arg(long)]
        branch: Option<Branch>,

        /// Matches name or email.
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a new faculty member, or an administrator with `--admin`.
    AddFaculty(NewFaculty),

    /// Change some of a faculty member's details.
    UpdateFaculty {
        id: String,

        #[command(flatten)]
        changes: FacultyChanges,
    },

    /// Remove a faculty member who no longer teaches any course.
    DeleteFaculty { id: String },

    /// List courses. Faculty and students only see their own.
    Courses {
        #[arg(long)]
        branch: Option<Branch>,

        /// Matches course name or ID.
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a new course.
    AddCourse(NewCourse),

    /// List the students enrolled in a course.
    Roster { course: String },

    /// Take attendance for one of your courses.
    Mark(MarkAttendance),

    /// Show attendance records, optionally filtered.
    Report(ReportFilter),

    /// List login credentials.
    Credentials {
        #[arg(long, value_enum, default_value_t)]
        role: RoleFilter,

        #[arg(long)]
        show_passwords: bool,
    },

    /// Export login credentials to a CSV file.
    ExportCredentials {
        #[arg(long, value_enum, default_value_t)]
        role: RoleFilter,

        /// Overrides the configured export directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Email a user their login credentials.
    SendCredentials { id: String },

    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, PartialEq)]
pub struct NewStudent {
    /// Defaults to the next free ID.
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub roll_number: String,
    #[arg(long)]
    pub branch: Branch,
    #[arg(long)]
    pub year: Year,
    #[arg(long)]
    pub email: String,
    /// Defaults to a random eight-character password.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug, PartialEq)]
pub struct StudentChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub roll_number: Option<String>,
    #[arg(long)]
    pub branch: Option<Branch>,
    #[arg(long)]
    pub year: Option<Year>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
}

impl From<StudentChanges> for StudentUpdate {
    fn from(changes: StudentChanges) -> Self {
        Self {
            name: changes.name,
            roll_number: changes.roll_number,
            branch: changes.branch,
            year: changes.year,
            email: changes.email,
            password: changes.password,
        }
    }
}

#[derive(Args, Debug, PartialEq)]
pub struct NewFaculty {
    /// Defaults to the next free ID.
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Defaults to a random eight-character password.
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, required_unless_present = "admin", conflicts_with = "admin")]
    pub branch: Option<Branch>,
    #[arg(long)]
    pub admin: bool,
}

impl NewFaculty {
    pub fn position(&self) -> Position {
        match self.branch {
            Some(branch) if !self.admin => Position::Faculty { branch },
            _ => Position::Admin,
        }
    }
}

#[derive(Args, Debug, PartialEq)]
pub struct FacultyChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Moves a faculty member to another branch.
    #[arg(long)]
    pub branch: Option<Branch>,
}

impl From<FacultyChanges> for FacultyUpdate {
    fn from(changes: FacultyChanges) -> Self {
        Self {
            name: changes.name,
            email: changes.email,
            password: changes.password,
            position: changes.branch.map(|branch| Position::Faculty { branch }),
        }
    }
}

#[derive(Args, Debug, PartialEq)]
pub struct NewCourse {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub branch: Branch,
    #[arg(long)]
    pub year: Year,
    /// The ID of the faculty member teaching it.
    #[arg(long)]
    pub faculty: String,
}

#[derive(Args, Debug, PartialEq)]
pub struct MarkAttendance {
    pub course: String,

    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Mark every enrolled student with this status before applying `--present`/`--absent`.
    #[arg(long)]
    pub all: Option<Status>,

    #[arg(long, value_delimiter = ',')]
    pub present: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub absent: Vec<String>,
}

#[derive(Args, Debug, Default, PartialEq)]
pub struct ReportFilter {
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub course: Option<String>,
    /// Matches student or course names, ignoring case.
    #[arg(long)]
    pub search: Option<String>,
}

impl From<ReportFilter> for AttendanceFilter {
    fn from(filter: ReportFilter) -> Self {
        Self {
            date: filter.date,
            course_id: filter.course,
            search: filter.search,
        }
    }
}

/// Splits a shell line into words. Single or double quotes keep spaces inside a word.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => word.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(word);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Line::try_parse_from(split_line(line).unwrap()).unwrap().command
    }

    #[test]
    fn split_line_respects_quotes() {
        assert_eq!(
            split_line(r#"add-student --name "Kiran Rao" --email 'k@demo.com'"#).unwrap(),
            ["add-student", "--name", "Kiran Rao", "--email", "k@demo.com"]
        );
        assert_eq!(split_line("  ").unwrap(), Vec::<String>::new());
        assert_eq!(split_line(r#"--name """#).unwrap(), ["--name", ""]);
        assert!(split_line(r#"--name "Kiran"#).is_err());
    }

    #[test]
    fn parses_login() {
        assert_eq!(
            parse("login alice@demo.com alice123"),
            Command::Login {
                email: "alice@demo.com".to_string(),
                password: "alice123".to_string(),
            }
        );
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn parses_branch_codes_and_lists() {
        let Command::Mark(mark) = parse("mark C101 --date 2025-01-17 --present S001,S007 --all absent")
        else {
            panic!("expected mark");
        };
        assert_eq!(mark.present, ["S001", "S007"]);
        assert_eq!(mark.all, Some(Status::Absent));
        assert_eq!(mark.date, NaiveDate::from_ymd_opt(2025, 1, 17));

        let Command::Students { branch, .. } = parse("students --branch CSE-DS") else {
            panic!("expected students");
        };
        assert_eq!(branch, Some(Branch::CseDataScience));
    }

    #[test]
    fn new_faculty_needs_a_branch_or_admin() {
        let words = split_line("add-faculty --name X --email x@college.com --password p").unwrap();
        assert!(Line::try_parse_from(words).is_err());

        let Command::AddFaculty(admin) =
            parse("add-faculty --name X --email x@college.com --password p --admin")
        else {
            panic!("expected add-faculty");
        };
        assert_eq!(admin.position(), Position::Admin);
    }

    #[test]
    fn passwords_are_optional_for_new_accounts() {
        let Command::AddStudent(student) = parse(
            "add-student --name Kiran --roll-number 111 --branch CSE --year I --email k@demo.com",
        ) else {
            panic!("expected add-student");
        };
        assert_eq!(student.password, None);

        let Command::Faculty { branch, search } = parse("faculty --branch cs&am --search khan")
        else {
            panic!("expected faculty");
        };
        assert_eq!(branch, Some(Branch::CsAm));
        assert_eq!(search.as_deref(), Some("khan"));
    }

    #[test]
    fn credentials_default_to_all_roles() {
        assert_eq!(
            parse("credentials"),
            Command::Credentials {
                role: RoleFilter::All,
                show_passwords: false,
            }
        );
    }
}
