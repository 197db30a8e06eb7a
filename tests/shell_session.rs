use edutrack::settings::{MailSettings, Settings};
use edutrack::shell::Shell;
use edutrack::store::AttendanceStore;
use std::fs;
use std::path::Path;

fn settings(root: &Path) -> Settings {
    Settings {
        login_delay_ms: 0,
        export_dir: root.join("exports"),
        mail: MailSettings {
            outbox_dir: root.join("outbox"),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn run(shell: &mut Shell, script: &str) -> String {
    let mut out = Vec::new();
    shell.run(script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn admin_manages_accounts_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = Shell::new(AttendanceStore::seeded(), settings(dir.path()));

    let out = run(
        &mut shell,
        r#"
login admin@college.com admin123
add-faculty --name "Prof. E Nair" --email enair@college.com --password prof123 --branch CSE-AIML
add-course --id C109 --name "Computer Vision" --branch CSE-AIML --year III --faculty F006
update-student S003 --password carol456
export-credentials --role student
send-credentials S003
delete-faculty F006
"#,
    );

    assert!(out.contains("Welcome back, Dr. Admin"));
    assert!(out.contains("Added faculty member F006."));
    assert!(out.contains("Added course C109."));
    assert!(out.contains("Updated student S003 (Carol Thomas)."));
    assert!(out.contains("Error: The faculty member 'F006' is still referenced by course C109"));

    let exports: Vec<_> = fs::read_dir(dir.path().join("exports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(exports.len(), 1);
    assert!(exports[0].starts_with("login-credentials-student-"));

    let csv = fs::read_to_string(dir.path().join("exports").join(&exports[0])).unwrap();
    assert!(csv.starts_with("Name,Email,Password,Role\n"));
    assert!(csv.contains("Carol Thomas,carol@demo.com,carol456,Student"));

    let email = fs::read_to_string(dir.path().join("outbox").join("S003.eml")).unwrap();
    assert!(email.contains("Password: carol456"));
}

#[test]
fn faculty_takes_attendance_and_student_sees_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = Shell::new(AttendanceStore::seeded(), settings(dir.path()));

    let out = run(
        &mut shell,
        "
login csingh@college.com prof123
roster C106
mark C106 --date 2025-01-20 --present S003
logout
login carol@demo.com carol123
courses
",
    );

    assert!(out.contains("Carol Thomas"));
    assert!(out.contains("Saved attendance for 1 of 1 students in C106 on 2025-01-20"));
    assert!(out.contains("Goodbye, Prof. C Singh."));
    assert!(out.contains("Total: 2  Present: 2  Absent: 0  Rate: 100.0%"));
    assert!(out.contains("Deep Learning"));
    assert_eq!(shell.store().attendance().len(), 9);
}
