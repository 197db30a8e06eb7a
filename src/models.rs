//! The entities tracked by the attendance system: students, faculty, courses, and the attendance
//! records that tie them together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type StudentId = String;
pub type FacultyId = String;
pub type CourseId = String;
pub type RecordId = String;

/// An academic department track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "CSE (Data Science)")]
    CseDataScience,
    #[serde(rename = "CSE (AI & ML)")]
    CseAiMl,
    #[serde(rename = "CS & AM")]
    CsAm,
}

impl Branch {
    pub const ALL: [Branch; 4] = [
        Branch::Cse,
        Branch::CseDataScience,
        Branch::CseAiMl,
        Branch::CsAm,
    ];

    /// The full display name, e.g. `CSE (Data Science)`.
    pub fn name(self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::CseDataScience => "CSE (Data Science)",
            Branch::CseAiMl => "CSE (AI & ML)",
            Branch::CsAm => "CS & AM",
        }
    }

    /// The short code accepted on the command line, e.g. `CSE-DS`.
    pub fn code(self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::CseDataScience => "CSE-DS",
            Branch::CseAiMl => "CSE-AIML",
            Branch::CsAm => "CS&AM",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Branch::ALL
            .into_iter()
            .find(|branch| {
                s.eq_ignore_ascii_case(branch.name()) || s.eq_ignore_ascii_case(branch.code())
            })
            .ok_or_else(|| format!("unknown branch '{s}', expected one of CSE, CSE-DS, CSE-AIML, CS&AM"))
    }
}

/// A student's year of study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Year {
    I,
    II,
    III,
    IV,
}

impl Year {
    pub const ALL: [Year; 4] = [Year::I, Year::II, Year::III, Year::IV];

    pub fn numeral(self) -> &'static str {
        match self {
            Year::I => "I",
            Year::II => "II",
            Year::III => "III",
            Year::IV => "IV",
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.numeral())
    }
}

impl FromStr for Year {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" | "1" => Ok(Year::I),
            "II" | "2" => Ok(Year::II),
            "III" | "3" => Ok(Year::III),
            "IV" | "4" => Ok(Year::IV),
            other => Err(format!("unknown year '{other}', expected I, II, III or IV")),
        }
    }
}

/// Whether a student attended a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Present,
    Absent,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Present => f.write_str("Present"),
            Status::Absent => f.write_str("Absent"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Status::Present),
            "absent" | "a" => Ok(Status::Absent),
            other => Err(format!("unknown status '{other}', expected present or absent")),
        }
    }
}

/// The role a logged-in user acts under. Selects which dashboard they see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Faculty,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("Admin"),
            Role::Faculty => f.write_str("Faculty"),
            Role::Student => f.write_str("Student"),
        }
    }
}

/// The position a staff member holds. Administrators are not attached to any branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Position {
    Admin,
    Faculty { branch: Branch },
}

impl Position {
    pub fn role(self) -> Role {
        match self {
            Position::Admin => Role::Admin,
            Position::Faculty { .. } => Role::Faculty,
        }
    }

    pub fn branch(self) -> Option<Branch> {
        match self {
            Position::Admin => None,
            Position::Faculty { branch } => Some(branch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub roll_number: String,
    pub branch: Branch,
    pub year: Year,
    pub email: String,
    pub password: String,
}

/// A staff member: either a teaching faculty member or an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub position: Position,
}

impl Faculty {
    pub fn is_admin(&self) -> bool {
        self.position == Position::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub course_name: String,
    pub branch: Branch,
    pub year: Year,
    pub faculty_id: FacultyId,
}

/// A single student's status in a single class. `marked_by` is the email of whoever took
/// attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub status: Status,
    pub marked_by: String,
}

/// A set of optional changes to merge into an existing [`Student`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub branch: Option<Branch>,
    pub year: Option<Year>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every field of `student` that this update provides.
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(roll_number) = self.roll_number {
            student.roll_number = roll_number;
        }
        if let Some(branch) = self.branch {
            student.branch = branch;
        }
        if let Some(year) = self.year {
            student.year = year;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(password) = self.password {
            student.password = password;
        }
    }
}

/// A set of optional changes to merge into an existing [`Faculty`] row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub position: Option<Position>,
}

impl FacultyUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, member: &mut Faculty) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(password) = self.password {
            member.password = password;
        }
        if let Some(position) = self.position {
            member.position = position;
        }
    }
}

/// Everything the dashboards need to know about who is logged in, beyond their name and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Profile {
    Admin,
    Faculty {
        id: FacultyId,
        branch: Branch,
    },
    Student {
        id: StudentId,
        roll_number: String,
        branch: Branch,
        year: Year,
    },
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Admin => Role::Admin,
            Profile::Faculty { .. } => Role::Faculty,
            Profile::Student { .. } => Role::Student,
        }
    }
}

/// A login row, projected from a [`Student`] or [`Faculty`] row whenever it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub profile: Profile,
}

impl Credential {
    pub fn role(&self) -> Role {
        self.profile.role()
    }
}

impl From<&Student> for Credential {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            email: student.email.clone(),
            password: student.password.clone(),
            name: student.name.clone(),
            profile: Profile::Student {
                id: student.id.clone(),
                roll_number: student.roll_number.clone(),
                branch: student.branch,
                year: student.year,
            },
        }
    }
}

impl From<&Faculty> for Credential {
    fn from(member: &Faculty) -> Self {
        let profile = match member.position {
            Position::Admin => Profile::Admin,
            Position::Faculty { branch } => Profile::Faculty {
                id: member.id.clone(),
                branch,
            },
        };

        Self {
            id: member.id.clone(),
            email: member.email.clone(),
            password: member.password.clone(),
            name: member.name.clone(),
            profile,
        }
    }
}

/// The identity of a logged-in user. Held by the caller for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub profile: Profile,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }
}

impl From<Credential> for User {
    fn from(credential: Credential) -> Self {
        Self {
            email: credential.email,
            name: credential.name,
            profile: credential.profile,
        }
    }
}
