//! Text rendering of the store for each kind of user. Every function returns the rendered text
//! rather than printing it, so the shell decides where it goes.

use crate::models::{AttendanceRecord, Course, Credential, Faculty, Profile, Student, User};
use crate::stats::{self, AttendanceFilter, AttendanceStats};
use crate::store::AttendanceStore;
use tabled::{Table, Tabled, settings::Style};

/// How many records the dashboards list under "recent attendance".
const RECENT_RECORDS: usize = 5;

fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn students_table<'a>(students: impl IntoIterator<Item = &'a Student>) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "ID")]
        id: &'r str,
        #[tabled(rename = "Name")]
        name: &'r str,
        #[tabled(rename = "Roll No.")]
        roll_number: &'r str,
        #[tabled(rename = "Branch")]
        branch: &'static str,
        #[tabled(rename = "Year")]
        year: &'static str,
        #[tabled(rename = "Email")]
        email: &'r str,
    }

    render(students.into_iter().map(|s| Row {
        id: &s.id,
        name: &s.name,
        roll_number: &s.roll_number,
        branch: s.branch.name(),
        year: s.year.numeral(),
        email: &s.email,
    }))
}

pub fn faculty_table<'a>(faculty: impl IntoIterator<Item = &'a Faculty>) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "ID")]
        id: &'r str,
        #[tabled(rename = "Name")]
        name: &'r str,
        #[tabled(rename = "Email")]
        email: &'r str,
        #[tabled(rename = "Branch")]
        branch: &'static str,
        #[tabled(rename = "Role")]
        role: String,
    }

    render(faculty.into_iter().map(|f| Row {
        id: &f.id,
        name: &f.name,
        email: &f.email,
        branch: f.position.branch().map_or("-", |b| b.name()),
        role: f.position.role().to_string(),
    }))
}

pub fn courses_table<'a>(
    store: &AttendanceStore,
    courses: impl IntoIterator<Item = &'a Course>,
) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "ID")]
        id: &'r str,
        #[tabled(rename = "Course")]
        name: &'r str,
        #[tabled(rename = "Branch")]
        branch: &'static str,
        #[tabled(rename = "Year")]
        year: &'static str,
        #[tabled(rename = "Faculty")]
        faculty: &'r str,
    }

    render(courses.into_iter().map(|c| Row {
        id: &c.id,
        name: &c.course_name,
        branch: c.branch.name(),
        year: c.year.numeral(),
        faculty: faculty_name(store, &c.faculty_id),
    }))
}

/// Attendance records with student, course, and marker resolved to names.
pub fn records_table<'a>(
    store: &AttendanceStore,
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Student")]
        student: &'r str,
        #[tabled(rename = "Course")]
        course: &'r str,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Marked By")]
        marked_by: &'r str,
    }

    render(records.into_iter().map(|r| Row {
        date: r.date.format("%Y-%m-%d").to_string(),
        student: store.student(&r.student_id).map_or("Unknown", |s| s.name.as_str()),
        course: store
            .course(&r.course_id)
            .map_or("Unknown", |c| c.course_name.as_str()),
        status: r.status.to_string(),
        marked_by: store
            .faculty_by_email(&r.marked_by)
            .map_or(r.marked_by.as_str(), |f| f.name.as_str()),
    }))
}

/// Login credentials, with passwords masked unless `show_passwords` is set.
pub fn credentials_table(credentials: &[Credential], show_passwords: bool) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "Name")]
        name: &'r str,
        #[tabled(rename = "Email")]
        email: &'r str,
        #[tabled(rename = "Password")]
        password: &'r str,
        #[tabled(rename = "Role")]
        role: String,
    }

    render(credentials.iter().map(|c| Row {
        name: &c.name,
        email: &c.email,
        password: if show_passwords { &c.password } else { "********" },
        role: c.role().to_string(),
    }))
}

pub fn stats_line(stats: &AttendanceStats) -> String {
    format!(
        "Total: {}  Present: {}  Absent: {}  Rate: {}%",
        stats.total,
        stats.present,
        stats.absent,
        stats.rate_percent()
    )
}

pub fn branch_table(store: &AttendanceStore) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Branch")]
        branch: &'static str,
        #[tabled(rename = "Students")]
        students: usize,
    }

    render(
        stats::branch_distribution(store.students())
            .into_iter()
            .map(|(branch, students)| Row {
                branch: branch.name(),
                students,
            }),
    )
}

/// How many courses each branch offers.
pub fn course_branch_table(store: &AttendanceStore) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Branch")]
        branch: &'static str,
        #[tabled(rename = "Courses")]
        courses: usize,
    }

    render(
        stats::course_distribution(store.courses())
            .into_iter()
            .map(|(branch, courses)| Row {
                branch: branch.name(),
                courses,
            }),
    )
}

/// Where a student stands against the minimum attendance requirement.
pub fn attendance_goal(overall: &AttendanceStats) -> String {
    let verdict = if overall.meets_requirement() {
        "Great job! You're meeting the minimum attendance requirement."
    } else {
        "You need to improve your attendance to meet the 75% requirement."
    };

    format!(
        "Attendance Goal: {}% of {}% required\n{verdict}",
        overall.rate_percent(),
        stats::REQUIRED_RATE
    )
}

/// The attendance report: records matching `filter`, with a summary line on top.
pub fn report(store: &AttendanceStore, filter: &AttendanceFilter) -> String {
    let records =
        stats::filtered_attendance(store.attendance(), store.students(), store.courses(), filter);
    let summary = stats::attendance_stats(records.iter().copied());
    let count = records.len();

    format!(
        "{}\n\nAttendance Records ({count})\n{}",
        stats_line(&summary),
        records_table(store, records)
    )
}

/// The landing view for whoever is logged in.
pub fn dashboard(store: &AttendanceStore, user: &User) -> String {
    match &user.profile {
        Profile::Admin => admin_dashboard(store, user),
        Profile::Faculty { id, .. } => match store.faculty_member(id) {
            Some(member) => faculty_dashboard(store, member),
            None => format!("No faculty record found for {}.", user.email),
        },
        Profile::Student { id, .. } => match store.student(id) {
            Some(student) => student_dashboard(store, student),
            None => format!("No student record found for {}.", user.email),
        },
    }
}

pub fn admin_dashboard(store: &AttendanceStore, user: &User) -> String {
    let overview = stats::overview(store);

    format!(
        "Welcome back, {}\n\n\
         Total Students: {}  Faculty Members: {}  Active Courses: {}  Attendance Records: {}\n\n\
         Students by Branch\n{}\n\n\
         Recent Attendance\n{}",
        user.name,
        overview.students,
        overview.faculty,
        overview.courses,
        overview.records,
        branch_table(store),
        records_table(store, stats::recent(store.attendance(), RECENT_RECORDS)),
    )
}

pub fn faculty_dashboard(store: &AttendanceStore, member: &Faculty) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "ID")]
        id: &'r str,
        #[tabled(rename = "Course")]
        name: &'r str,
        #[tabled(rename = "Branch")]
        branch: &'static str,
        #[tabled(rename = "Year")]
        year: &'static str,
        #[tabled(rename = "Enrolled")]
        enrolled: usize,
        #[tabled(rename = "Attended")]
        attended: usize,
        #[tabled(rename = "Classes")]
        classes: usize,
    }

    let activity = stats::faculty_activity(store, member);
    let courses = stats::faculty_roster(store.courses(), &member.id);
    let marked = stats::records_marked_by(store.attendance(), &member.email);

    let course_rows = render(courses.into_iter().map(|c| {
        let summary = stats::course_summary(store.students(), store.attendance(), c);
        Row {
            id: &c.id,
            name: &c.course_name,
            branch: c.branch.name(),
            year: c.year.numeral(),
            enrolled: summary.enrolled,
            attended: summary.attended,
            classes: summary.classes,
        }
    }));

    format!(
        "Welcome, {}\n\n\
         My Courses: {}  Students Taught: {}  Attendance Records: {}  Recent Classes: {}\n\n\
         My Courses\n{}\n\n\
         Recent Attendance\n{}",
        member.name,
        activity.courses,
        activity.students_taught,
        activity.records,
        activity.classes,
        course_rows,
        records_table(store, marked.into_iter().take(RECENT_RECORDS)),
    )
}

pub fn student_dashboard(store: &AttendanceStore, student: &Student) -> String {
    #[derive(Tabled)]
    struct Row<'r> {
        #[tabled(rename = "Course")]
        name: &'r str,
        #[tabled(rename = "Faculty")]
        faculty: &'r str,
        #[tabled(rename = "Present")]
        present: usize,
        #[tabled(rename = "Total")]
        total: usize,
        #[tabled(rename = "Rate")]
        rate: String,
    }

    let overall = stats::student_attendance(store.attendance(), &student.id);
    let courses = stats::student_courses(store.courses(), student);

    let course_rows = render(courses.into_iter().map(|c| {
        let attendance = stats::course_attendance(store.attendance(), &student.id, &c.id);
        Row {
            name: &c.course_name,
            faculty: faculty_name(store, &c.faculty_id),
            present: attendance.present,
            total: attendance.total,
            rate: format!("{}%", attendance.rate_percent()),
        }
    }));

    let mine = store
        .attendance()
        .iter()
        .filter(|r| r.student_id == student.id);

    format!(
        "Welcome, {} ({}, {} Year, Roll No. {})\n\n\
         {}\n\n\
         My Courses\n{}\n\n\
         Attendance History\n{}\n\n\
         {}",
        student.name,
        student.branch,
        student.year,
        student.roll_number,
        stats_line(&overall),
        course_rows,
        records_table(store, mine),
        attendance_goal(&overall),
    )
}

fn faculty_name<'a>(store: &'a AttendanceStore, faculty_id: &str) -> &'a str {
    store
        .faculty_member(faculty_id)
        .map_or("Unknown", |f| f.name.as_str())
}
