//! The interactive shell: one store, one session, and a loop that reads commands and prints what
//! they produce.

use crate::auth::{Session, generate_password};
use crate::cli::{Command, Line, MarkAttendance, split_line};
use crate::display;
use crate::export::{self, RoleFilter};
use crate::mailer;
use crate::models::{Course, Faculty, Profile, Role, Status, Student, User};
use crate::settings::Settings;
use crate::stats;
use crate::store::AttendanceStore;
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::Parser;
use log::warn;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

/// What the shell should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Shell {
    store: AttendanceStore,
    session: Session,
    settings: Settings,
}

impl Shell {
    pub fn new(store: AttendanceStore, settings: Settings) -> Self {
        Self {
            store,
            session: Session::default(),
            settings,
        }
    }

    pub fn store(&self) -> &AttendanceStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads commands from `input` until it ends or a `quit`, writing every reply and error to
    /// `output`. Errors from individual commands do not stop the loop.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            match self.run_line(&line) {
                Ok(Reply::Text(text)) => writeln!(output, "{text}")?,
                Ok(Reply::Quit) => break,
                Err(e) => writeln!(output, "Error: {e:#}")?,
            }
        }

        Ok(())
    }

    /// Parses and executes a single line.
    pub fn run_line(&mut self, line: &str) -> Result<Reply> {
        let words = split_line(line).map_err(|e| anyhow!(e))?;

        match Line::try_parse_from(words) {
            Ok(parsed) => self.execute(parsed.command),
            // `--help` and friends come back as "errors" carrying the text to show.
            Err(e) if !e.use_stderr() => Ok(Reply::Text(e.to_string())),
            Err(e) => bail!("{}", e.to_string().trim_end()),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let text = match command {
            Command::Login { email, password } => {
                thread::sleep(Duration::from_millis(self.settings.login_delay_ms));
                let user = self.session.login(&self.store, &email, &password)?;
                display::dashboard(&self.store, &user)
            }
            Command::Logout => match self.session.logout() {
                Some(user) => format!("Goodbye, {}.", user.name),
                None => "Nobody is logged in.".to_string(),
            },
            Command::Whoami => match self.session.user() {
                Some(user) => format!("{} <{}> ({})", user.name, user.email, user.role()),
                None => "Nobody is logged in.".to_string(),
            },
            Command::Quit => return Ok(Reply::Quit),
            Command::Dashboard => display::dashboard(&self.store, self.user()?),

            Command::Students { branch, search } => {
                self.require(Role::Admin)?;
                display::students_table(stats::search_students(
                    self.store.students(),
                    branch,
                    search.as_deref(),
                ))
            }
            Command::AddStudent(new) => {
                self.require(Role::Admin)?;
                let id = match new.id {
                    Some(id) => id,
                    None => self.store.next_student_id()?,
                };
                let (password, generated) = password_or_generated(new.password);
                self.store.add_student(Student {
                    id: id.clone(),
                    name: new.name,
                    roll_number: new.roll_number,
                    branch: new.branch,
                    year: new.year,
                    email: new.email,
                    password,
                })?;
                format!("Added student {id}.{generated}")
            }
            Command::UpdateStudent { id, changes } => {
                self.require(Role::Admin)?;
                let student = self.store.update_student(&id, changes.into())?;
                format!("Updated student {} ({}).", student.id, student.name)
            }
            Command::DeleteStudent { id } => {
                self.require(Role::Admin)?;
                let student = self.store.delete_student(&id)?;
                format!("Deleted student {} ({}).", student.id, student.name)
            }

            Command::Faculty { branch, search } => {
                self.require(Role::Admin)?;
                display::faculty_table(stats::search_faculty(
                    self.store.faculty(),
                    branch,
                    search.as_deref(),
                ))
            }
            Command::AddFaculty(new) => {
                self.require(Role::Admin)?;
                let id = match &new.id {
                    Some(id) => id.clone(),
                    None => self.store.next_faculty_id()?,
                };
                let position = new.position();
                let (password, generated) = password_or_generated(new.password);
                self.store.add_faculty(Faculty {
                    id: id.clone(),
                    name: new.name,
                    email: new.email,
                    password,
                    position,
                })?;
                format!("Added faculty member {id}.{generated}")
            }
            Command::UpdateFaculty { id, changes } => {
                self.require(Role::Admin)?;
                let member = self.store.update_faculty(&id, changes.into())?;
                format!("Updated faculty member {} ({}).", member.id, member.name)
            }
            Command::DeleteFaculty { id } => {
                self.require(Role::Admin)?;
                let member = self.store.delete_faculty(&id)?;
                format!("Deleted faculty member {} ({}).", member.id, member.name)
            }

            Command::Courses { branch, search } => {
                let courses = self.visible_courses()?;
                let table = display::courses_table(
                    &self.store,
                    stats::search_courses(courses, branch, search.as_deref()),
                );

                if self.user()?.role() == Role::Admin {
                    format!(
                        "{table}\n\nCourse Summary\n{}",
                        display::course_branch_table(&self.store)
                    )
                } else {
                    table
                }
            }
            Command::AddCourse(new) => {
                self.require(Role::Admin)?;
                let id = new.id.clone();
                self.store.add_course(Course {
                    id: new.id,
                    course_name: new.name,
                    branch: new.branch,
                    year: new.year,
                    faculty_id: new.faculty,
                })?;
                format!("Added course {id}.")
            }
            Command::Roster { course } => {
                let course = self.managed_course(&course)?;
                display::students_table(stats::eligible_roster(self.store.students(), course))
            }
            Command::Mark(mark) => self.mark(mark)?,
            Command::Report(filter) => {
                self.require(Role::Admin)?;
                display::report(&self.store, &filter.into())
            }

            Command::Credentials {
                role,
                show_passwords,
            } => {
                self.require(Role::Admin)?;
                let credentials: Vec<_> = self
                    .store
                    .credentials()
                    .into_iter()
                    .filter(|c| role.matches(c.role()))
                    .collect();
                display::credentials_table(&credentials, show_passwords)
            }
            Command::ExportCredentials { role, dir } => {
                self.require(Role::Admin)?;
                self.export(role, dir)
            }
            Command::SendCredentials { id } => {
                self.require(Role::Admin)?;
                let credential = self
                    .store
                    .credentials()
                    .into_iter()
                    .find(|c| c.id == id)
                    .with_context(|| format!("No account with ID '{id}'"))?;

                match mailer::notify(&credential, &self.settings.mail) {
                    Some(path) => format!(
                        "Credentials email for {} queued at {}.",
                        credential.email,
                        path.display()
                    ),
                    None => format!("Could not queue an email for {}.", credential.email),
                }
            }
        };

        Ok(Reply::Text(text))
    }

    fn user(&self) -> Result<&User> {
        self.session
            .user()
            .ok_or_else(|| anyhow!("Please log in first."))
    }

    fn require(&self, role: Role) -> Result<&User> {
        let user = self.user()?;
        if user.role() != role {
            bail!("This command is only available to {role} users.");
        }
        Ok(user)
    }

    /// Admins see every course, faculty see what they teach, students see what they take.
    fn visible_courses(&self) -> Result<Vec<&Course>> {
        let user = self.user()?;
        let courses = self.store.courses();

        Ok(match &user.profile {
            Profile::Admin => courses.iter().collect(),
            Profile::Faculty { id, .. } => stats::faculty_roster(courses, id),
            Profile::Student { id, .. } => match self.store.student(id) {
                Some(student) => stats::student_courses(courses, student),
                None => Vec::new(),
            },
        })
    }

    /// A course the logged-in user may take attendance for or inspect the roster of: any course
    /// for an admin, only their own for faculty.
    fn managed_course(&self, course_id: &str) -> Result<&Course> {
        let user = self.user()?;
        let course = self
            .store
            .course(course_id)
            .with_context(|| format!("No course with ID '{course_id}'"))?;

        match &user.profile {
            Profile::Admin => Ok(course),
            Profile::Faculty { id, .. } => {
                if *id != course.faculty_id {
                    bail!("You do not teach {course_id}.");
                }
                Ok(course)
            }
            Profile::Student { .. } => bail!("This command is only available to Faculty users."),
        }
    }

    fn mark(&mut self, mark: MarkAttendance) -> Result<String> {
        let marked_by = self.require(Role::Faculty)?.email.clone();
        let course = self.managed_course(&mark.course)?;
        let date = mark.date.unwrap_or_else(|| Local::now().date_naive());

        let mut marks: Vec<(String, Status)> = match mark.all {
            Some(status) => stats::eligible_roster(self.store.students(), course)
                .into_iter()
                .map(|s| (s.id.clone(), status))
                .collect(),
            None => Vec::new(),
        };
        let explicit = mark
            .present
            .into_iter()
            .map(|id| (id, Status::Present))
            .chain(mark.absent.into_iter().map(|id| (id, Status::Absent)));
        for (id, status) in explicit {
            match marks.iter_mut().find(|(marked, _)| *marked == id) {
                Some(entry) => entry.1 = status,
                None => marks.push((id, status)),
            }
        }

        if marks.is_empty() {
            bail!("Nobody to mark: use --all, --present, or --absent.");
        }

        let written = self
            .store
            .mark_attendance(&mark.course, date, &marks, &marked_by)?;
        let present = marks.iter().filter(|(_, s)| *s == Status::Present).count();

        Ok(format!(
            "Saved attendance for {written} of {} students in {} on {date} ({present} marked present).",
            marks.len(),
            mark.course
        ))
    }

    fn export(&self, role: RoleFilter, dir: Option<std::path::PathBuf>) -> String {
        let dir = dir.unwrap_or_else(|| self.settings.export_dir.clone());
        let today = Local::now().date_naive();

        match export::export_to_dir(&self.store, role, &dir, today) {
            Ok(path) => format!("Exported credentials to {}.", path.display()),
            Err(e) => {
                warn!("Credential export to {} failed: {e:#}", dir.display());
                format!("Could not export credentials to {}.", dir.display())
            }
        }
    }
}

/// The password to use for a new account, plus a note to append to the reply when one had to be
/// generated.
fn password_or_generated(password: Option<String>) -> (String, String) {
    match password {
        Some(password) => (password, String::new()),
        None => {
            let password = generate_password();
            let note = format!(" Generated password: {password}");
            (password, note)
        }
    }
}
