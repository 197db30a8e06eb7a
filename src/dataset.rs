//! The data an [`AttendanceStore`](crate::store::AttendanceStore) starts from: either the built-in
//! demo institution or a JSON file in the same shape.

use crate::error::DatasetError;
use crate::models::{AttendanceRecord, Branch, Course, Faculty, Position, Status, Student, Year};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub students: Vec<Student>,
    pub faculty: Vec<Faculty>,
    pub courses: Vec<Course>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl Dataset {
    /// Reads a dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// The demo institution: ten students, four faculty members and an administrator, eight
    /// courses, and two days of attendance.
    pub fn seed() -> Self {
        Self {
            students: vec![
                student("S001", "Alice Kumar", "101", Branch::Cse, Year::I, "alice"),
                student("S002", "Bob Singh", "102", Branch::CseDataScience, Year::II, "bob"),
                student("S003", "Carol Thomas", "103", Branch::CseAiMl, Year::III, "carol"),
                student("S004", "David Reddy", "104", Branch::CsAm, Year::IV, "david"),
                student("S005", "Eva Shah", "105", Branch::Cse, Year::II, "eva"),
                student("S006", "Frank Joseph", "106", Branch::CseDataScience, Year::III, "frank"),
                student("S007", "Grace Iyer", "107", Branch::CseAiMl, Year::I, "grace"),
                student("S008", "Hari Prasad", "108", Branch::CsAm, Year::II, "hari"),
                student("S009", "Indu Patel", "109", Branch::Cse, Year::III, "indu"),
                student("S010", "John Fernandes", "110", Branch::CseDataScience, Year::IV, "john"),
            ],
            faculty: vec![
                teacher("F001", "Prof. A Rao", "arao", Branch::Cse),
                teacher("F002", "Prof. B Das", "bdas", Branch::CseDataScience),
                teacher("F003", "Prof. C Singh", "csingh", Branch::CseAiMl),
                teacher("F004", "Prof. D Khan", "dkhan", Branch::CsAm),
                Faculty {
                    id: "F005".to_string(),
                    name: "Dr. Admin".to_string(),
                    email: "admin@college.com".to_string(),
                    password: "admin123".to_string(),
                    position: Position::Admin,
                },
            ],
            courses: vec![
                course("C101", "Data Structures", Branch::Cse, Year::I, "F001"),
                course("C102", "Machine Learning", Branch::CseAiMl, Year::III, "F003"),
                course("C103", "Database Systems", Branch::CseDataScience, Year::II, "F002"),
                course("C104", "Algorithms", Branch::CsAm, Year::IV, "F004"),
                course("C105", "Software Engineering", Branch::Cse, Year::II, "F001"),
                course("C106", "Deep Learning", Branch::CseAiMl, Year::III, "F003"),
                course("C107", "Big Data Analytics", Branch::CseDataScience, Year::III, "F002"),
                course("C108", "Computer Graphics", Branch::CsAm, Year::II, "F004"),
            ],
            attendance: vec![
                record("A001", 15, "S001", "C101", Status::Present, "arao"),
                record("A002", 15, "S005", "C105", Status::Absent, "arao"),
                record("A003", 15, "S002", "C103", Status::Present, "bdas"),
                record("A004", 15, "S003", "C102", Status::Present, "csingh"),
                record("A005", 15, "S004", "C104", Status::Present, "dkhan"),
                record("A006", 16, "S001", "C101", Status::Present, "arao"),
                record("A007", 16, "S007", "C102", Status::Absent, "csingh"),
                record("A008", 16, "S006", "C107", Status::Present, "bdas"),
            ],
        }
    }
}

fn student(id: &str, name: &str, roll: &str, branch: Branch, year: Year, login: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        roll_number: roll.to_string(),
        branch,
        year,
        email: format!("{login}@demo.com"),
        password: format!("{login}123"),
    }
}

fn teacher(id: &str, name: &str, login: &str, branch: Branch) -> Faculty {
    Faculty {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{login}@college.com"),
        password: "prof123".to_string(),
        position: Position::Faculty { branch },
    }
}

fn course(id: &str, name: &str, branch: Branch, year: Year, faculty_id: &str) -> Course {
    Course {
        id: id.to_string(),
        course_name: name.to_string(),
        branch,
        year,
        faculty_id: faculty_id.to_string(),
    }
}

/// All seeded attendance was taken in January 2025.
fn record(
    id: &str,
    day: u32,
    student_id: &str,
    course_id: &str,
    status: Status,
    marker: &str,
) -> AttendanceRecord {
    AttendanceRecord {
        id: id.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, day).expect("seeded days fall within January"),
        student_id: student_id.to_string(),
        course_id: course_id.to_string(),
        status,
        marked_by: format!("{marker}@college.com"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_has_expected_shape() {
        let seed = Dataset::seed();
        assert_eq!(seed.students.len(), 10);
        assert_eq!(seed.faculty.len(), 5);
        assert_eq!(seed.courses.len(), 8);
        assert_eq!(seed.attendance.len(), 8);
        assert_eq!(seed.students[9].email, "john@demo.com");
        assert_eq!(seed.attendance[0].date.to_string(), "2025-01-15");
    }

    #[test]
    fn load_reads_json_dataset() {
        let json = serde_json::to_string_pretty(&Dataset::seed()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = Dataset::load(file.path()).unwrap();
        assert_eq!(loaded, Dataset::seed());
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        assert!(matches!(
            Dataset::load(file.path()),
            Err(DatasetError::Parse(_))
        ));
    }
}
