use edutrack::auth::authenticate;
use edutrack::error::{AuthError, StoreError};
use edutrack::models::{Branch, FacultyUpdate, Role, Status, Student, Year};
use edutrack::stats::{self, AttendanceFilter, AttendanceStats};
use edutrack::store::AttendanceStore;
use pretty_assertions::assert_eq;

fn kiran(id: String) -> Student {
    Student {
        id,
        name: "Kiran Rao".to_string(),
        roll_number: "111".to_string(),
        branch: Branch::CseAiMl,
        year: Year::II,
        email: "kiran@demo.com".to_string(),
        password: "kiran123".to_string(),
    }
}

#[test]
fn stats_are_consistent_for_every_student() {
    let store = AttendanceStore::seeded();

    for student in store.students() {
        let stats = stats::student_attendance(store.attendance(), &student.id);
        assert_eq!(stats.present + stats.absent, stats.total);
        if let Some(rate) = stats.rate() {
            assert!((0.0..=100.0).contains(&rate));
        }
    }
}

#[test]
fn empty_record_set_has_zero_stats() {
    let stats = stats::attendance_stats(std::iter::empty());
    assert_eq!(
        stats,
        AttendanceStats {
            total: 0,
            present: 0,
            absent: 0
        }
    );
    assert_eq!(stats.rate_percent(), "0");
}

#[test]
fn course_filter_on_seeded_records() {
    let store = AttendanceStore::seeded();
    let filter = AttendanceFilter {
        course_id: Some("C101".to_string()),
        ..Default::default()
    };

    let records =
        stats::filtered_attendance(store.attendance(), store.students(), store.courses(), &filter);
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["A001", "A006"]);
    assert!(records.iter().all(|r| r.status == Status::Present));

    let stats = stats::attendance_stats(records);
    assert_eq!((stats.total, stats.present, stats.absent), (2, 2, 0));
    assert_eq!(stats.rate_percent(), "100.0");
}

#[test]
fn branch_distribution_of_seeded_students() {
    let store = AttendanceStore::seeded();
    let counts: Vec<_> = stats::branch_distribution(store.students())
        .into_iter()
        .map(|(branch, count)| (branch.to_string(), count))
        .collect();

    assert_eq!(
        counts,
        [
            ("CSE".to_string(), 3),
            ("CSE (Data Science)".to_string(), 3),
            ("CSE (AI & ML)".to_string(), 2),
            ("CS & AM".to_string(), 2),
        ]
    );
}

#[test]
fn cse_first_years_are_only_alice() {
    let store = AttendanceStore::seeded();
    let course = store.course("C101").unwrap();
    assert_eq!((course.branch, course.year), (Branch::Cse, Year::I));

    let roster: Vec<_> = stats::eligible_roster(store.students(), course)
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(roster, ["Alice Kumar"]);
}

#[test]
fn added_student_can_log_in() {
    let mut store = AttendanceStore::seeded();
    let id = store.next_student_id().unwrap();
    store.add_student(kiran(id.clone())).unwrap();

    let credential = store
        .credentials()
        .into_iter()
        .find(|c| c.id == id)
        .unwrap();
    assert_eq!(credential.email, "kiran@demo.com");
    assert_eq!(credential.password, "kiran123");

    let user = authenticate(&store, "kiran@demo.com", "kiran123").unwrap();
    assert_eq!(user.role(), Role::Student);
    assert_eq!(user.name, "Kiran Rao");
}

#[test]
fn deleted_student_can_no_longer_log_in() {
    let mut store = AttendanceStore::seeded();
    store.delete_student("S002").unwrap();

    assert!(store.credentials().iter().all(|c| c.id != "S002"));
    assert_eq!(
        authenticate(&store, "bob@demo.com", "bob123"),
        Err(AuthError::InvalidCredentials)
    );
    assert!(matches!(
        store.delete_student("S002"),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn password_change_touches_only_the_password() {
    let mut store = AttendanceStore::seeded();
    let before = store.faculty_member("F002").unwrap().clone();

    store
        .update_faculty(
            "F002",
            FacultyUpdate {
                password: Some("newpw".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let after = store.faculty_member("F002").unwrap();
    assert_eq!(after.password, "newpw");
    assert_eq!(after.name, before.name);
    assert_eq!(after.email, before.email);
    assert_eq!(after.position, before.position);

    let credential = store
        .credentials()
        .into_iter()
        .find(|c| c.id == "F002")
        .unwrap();
    assert_eq!(credential.password, "newpw");
    assert_eq!(credential.email, "bdas@college.com");
    assert_eq!(credential.name, "Prof. B Das");

    assert!(authenticate(&store, "bdas@college.com", "prof123").is_err());
    assert!(authenticate(&store, "bdas@college.com", "newpw").is_ok());
}

#[test]
fn every_row_has_exactly_one_credential() {
    let mut store = AttendanceStore::seeded();
    store.add_student(kiran("S011".to_string())).unwrap();
    store.delete_student("S004").unwrap();

    let credentials = store.credentials();
    assert_eq!(
        credentials.len(),
        store.students().len() + store.faculty().len()
    );
    for student in store.students() {
        assert_eq!(credentials.iter().filter(|c| c.id == student.id).count(), 1);
    }
    for member in store.faculty() {
        assert_eq!(credentials.iter().filter(|c| c.id == member.id).count(), 1);
    }
}

#[test]
fn stores_are_independent() {
    let mut first = AttendanceStore::seeded();
    let second = AttendanceStore::seeded();

    first.delete_student("S001").unwrap();

    assert!(first.student("S001").is_none());
    assert!(second.student("S001").is_some());
}
