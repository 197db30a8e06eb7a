//! Read-only summaries computed over the store's collections.
//!
//! Nothing here mutates anything. Every function takes the slices it needs, so it can be run
//! against a live [`AttendanceStore`] or any snapshot of one.

use crate::models::{AttendanceRecord, Branch, Course, Faculty, Status, Student};
use crate::store::AttendanceStore;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// The minimum attendance percentage students are held to.
pub const REQUIRED_RATE: usize = 75;

/// Present/absent counts over some set of attendance records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
}

impl AttendanceStats {
    /// The attendance rate as a percentage, or `None` when there are no records at all.
    pub fn rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.present as f64 / self.total as f64 * 100.0)
    }

    /// The attendance rate to one decimal place, e.g. `"66.7"`.
    ///
    /// This is `"0"` when there are no records, which is not the same as `"0.0"`: a student
    /// with no classes yet has not missed any.
    pub fn rate_percent(&self) -> String {
        match self.rate_tenths() {
            Some(tenths) => format!("{}.{}", tenths / 10, tenths % 10),
            None => "0".to_string(),
        }
    }

    /// Whether the rate, as displayed, reaches [`REQUIRED_RATE`]. No records counts as 0%.
    pub fn meets_requirement(&self) -> bool {
        self.rate_tenths().unwrap_or(0) >= REQUIRED_RATE * 10
    }

    /// The rate in tenths of a percent, with halves rounded up.
    fn rate_tenths(&self) -> Option<usize> {
        (self.total > 0).then(|| (2000 * self.present + self.total) / (2 * self.total))
    }
}

pub fn attendance_stats<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> AttendanceStats {
    let mut stats = AttendanceStats::default();

    for record in records {
        stats.total += 1;
        match record.status {
            Status::Present => stats.present += 1,
            Status::Absent => stats.absent += 1,
        }
    }

    stats
}

/// Overall attendance for one student across every course.
pub fn student_attendance(records: &[AttendanceRecord], student_id: &str) -> AttendanceStats {
    attendance_stats(records.iter().filter(|r| r.student_id == student_id))
}

/// Attendance for one student in one course.
pub fn course_attendance(
    records: &[AttendanceRecord],
    student_id: &str,
    course_id: &str,
) -> AttendanceStats {
    attendance_stats(
        records
            .iter()
            .filter(|r| r.student_id == student_id && r.course_id == course_id),
    )
}

/// The students enrolled in a course: exactly those in its branch and year.
pub fn eligible_roster<'a>(students: &'a [Student], course: &Course) -> Vec<&'a Student> {
    students
        .iter()
        .filter(|s| s.branch == course.branch && s.year == course.year)
        .collect()
}

/// The courses a student is enrolled in, by the same branch and year rule.
pub fn student_courses<'a>(courses: &'a [Course], student: &Student) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|c| c.branch == student.branch && c.year == student.year)
        .collect()
}

/// The courses taught by one faculty member.
pub fn faculty_roster<'a>(courses: &'a [Course], faculty_id: &str) -> Vec<&'a Course> {
    courses.iter().filter(|c| c.faculty_id == faculty_id).collect()
}

/// Headcount per branch, in the order each branch first appears among `students`.
pub fn branch_distribution(students: &[Student]) -> IndexMap<Branch, usize> {
    let mut counts = IndexMap::new();

    for student in students {
        *counts.entry(student.branch).or_insert(0) += 1;
    }

    counts
}

/// Courses per branch. Every branch is listed, including those with no courses.
pub fn course_distribution(courses: &[Course]) -> IndexMap<Branch, usize> {
    Branch::ALL
        .iter()
        .map(|&branch| (branch, courses.iter().filter(|c| c.branch == branch).count()))
        .collect()
}

fn lowercase_needle(search: Option<&str>) -> String {
    search.map(str::to_lowercase).unwrap_or_default()
}

/// Students in `branch` (if given) whose name, roll number, or email contains `search`. Names
/// and emails are compared ignoring case.
pub fn search_students<'a>(
    students: &'a [Student],
    branch: Option<Branch>,
    search: Option<&str>,
) -> Vec<&'a Student> {
    let needle = lowercase_needle(search);

    students
        .iter()
        .filter(|s| branch.is_none_or(|b| s.branch == b))
        .filter(|s| {
            s.name.to_lowercase().contains(&needle)
                || s.roll_number.contains(&needle)
                || s.email.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Teaching faculty in `branch` (if given) whose name or email contains `search`, ignoring case.
/// Administrators are never listed.
pub fn search_faculty<'a>(
    faculty: &'a [Faculty],
    branch: Option<Branch>,
    search: Option<&str>,
) -> Vec<&'a Faculty> {
    let needle = lowercase_needle(search);

    faculty
        .iter()
        .filter(|f| !f.is_admin())
        .filter(|f| branch.is_none_or(|b| f.position.branch() == Some(b)))
        .filter(|f| {
            f.name.to_lowercase().contains(&needle) || f.email.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Courses in `branch` (if given) whose name or ID contains `search`, ignoring case.
pub fn search_courses<'a>(
    courses: impl IntoIterator<Item = &'a Course>,
    branch: Option<Branch>,
    search: Option<&str>,
) -> Vec<&'a Course> {
    let needle = lowercase_needle(search);

    courses
        .into_iter()
        .filter(|c| branch.is_none_or(|b| c.branch == b))
        .filter(|c| {
            c.course_name.to_lowercase().contains(&needle)
                || c.id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// The filters available on the attendance report. Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub course_id: Option<String>,
    /// Case-insensitive substring of either the student's name or the course's name.
    pub search: Option<String>,
}

/// Keeps the records that match every filter that is set.
pub fn filtered_attendance<'a>(
    records: &'a [AttendanceRecord],
    students: &[Student],
    courses: &[Course],
    filter: &AttendanceFilter,
) -> Vec<&'a AttendanceRecord> {
    let needle = filter
        .search
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    records
        .iter()
        .filter(|record| filter.date.is_none_or(|date| record.date == date))
        .filter(|record| {
            filter
                .course_id
                .as_deref()
                .is_none_or(|course_id| record.course_id == course_id)
        })
        .filter(|record| {
            let Some(needle) = &needle else {
                return true;
            };

            let student_matches = students
                .iter()
                .find(|s| s.id == record.student_id)
                .is_some_and(|s| s.name.to_lowercase().contains(needle));
            let course_matches = courses
                .iter()
                .find(|c| c.id == record.course_id)
                .is_some_and(|c| c.course_name.to_lowercase().contains(needle));

            student_matches || course_matches
        })
        .collect()
}

pub fn records_marked_by<'a>(
    records: &'a [AttendanceRecord],
    email: &str,
) -> Vec<&'a AttendanceRecord> {
    records.iter().filter(|r| r.marked_by == email).collect()
}

/// The first `n` records, in the order they were taken.
pub fn recent(records: &[AttendanceRecord], n: usize) -> &[AttendanceRecord] {
    &records[..n.min(records.len())]
}

/// How a single course is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    /// Students on the eligible roster.
    pub enrolled: usize,
    /// Distinct students with at least one record in the course.
    pub attended: usize,
    /// Distinct dates attendance was taken on.
    pub classes: usize,
}

pub fn course_summary(
    students: &[Student],
    records: &[AttendanceRecord],
    course: &Course,
) -> CourseSummary {
    let course_records = records.iter().filter(|r| r.course_id == course.id);

    let mut attended = HashSet::new();
    let mut classes = HashSet::new();
    for record in course_records {
        attended.insert(record.student_id.as_str());
        classes.insert(record.date);
    }

    CourseSummary {
        enrolled: eligible_roster(students, course).len(),
        attended: attended.len(),
        classes: classes.len(),
    }
}

/// The headline numbers on a faculty member's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacultyActivity {
    pub courses: usize,
    pub students_taught: usize,
    pub records: usize,
    pub classes: usize,
}

pub fn faculty_activity(store: &AttendanceStore, member: &Faculty) -> FacultyActivity {
    let marked = records_marked_by(store.attendance(), &member.email);

    FacultyActivity {
        courses: faculty_roster(store.courses(), &member.id).len(),
        students_taught: marked
            .iter()
            .map(|r| r.student_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        records: marked.len(),
        classes: marked.iter().map(|r| r.date).collect::<HashSet<_>>().len(),
    }
}

/// The headline numbers on the administrator's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub students: usize,
    pub faculty: usize,
    pub courses: usize,
    pub records: usize,
}

pub fn overview(store: &AttendanceStore) -> Overview {
    Overview {
        students: store.students().len(),
        faculty: store.faculty().iter().filter(|f| !f.is_admin()).count(),
        courses: store.courses().len(),
        records: store.attendance().len(),
    }
}
