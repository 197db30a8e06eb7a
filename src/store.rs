use crate::dataset::Dataset;
use crate::error::{DatasetError, Entity, StoreError};
use crate::models::{
    AttendanceRecord, Course, Credential, Faculty, FacultyUpdate, Position, Status, Student,
    StudentUpdate,
};
use crate::stats;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

/// The owner of every student, faculty member, course, and attendance record.
///
/// Each store is independent: build one from [`Dataset::seed`] or a dataset file, then read and
/// mutate it only through its methods. Login credentials are never stored separately, they are
/// projected from the student and faculty rows by [`AttendanceStore::credentials`].
#[derive(Debug, Clone, Default)]
pub struct AttendanceStore {
    students: Vec<Student>,
    faculty: Vec<Faculty>,
    courses: Vec<Course>,
    attendance: Vec<AttendanceRecord>,
}

impl AttendanceStore {
    /// Creates a store from a dataset, rejecting duplicate IDs or emails and dangling references.
    pub fn new(dataset: Dataset) -> Result<Self, StoreError> {
        let mut store = Self::default();

        for member in dataset.faculty {
            store.add_faculty(member)?;
        }
        for student in dataset.students {
            store.add_student(student)?;
        }
        for course in dataset.courses {
            store.add_course(course)?;
        }
        for record in dataset.attendance {
            store.insert_record(record)?;
        }

        Ok(store)
    }

    /// Creates a store holding the demo institution.
    pub fn seeded() -> Self {
        let Dataset {
            students,
            faculty,
            courses,
            attendance,
        } = Dataset::seed();

        Self {
            students,
            faculty,
            courses,
            attendance,
        }
    }

    /// Creates a store from a JSON dataset file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let dataset = Dataset::load(path)?;
        Ok(Self::new(dataset)?)
    }

    /// Returns a copy of everything in the store.
    pub fn snapshot(&self) -> Dataset {
        Dataset {
            students: self.students.clone(),
            faculty: self.faculty.clone(),
            courses: self.courses.clone(),
            attendance: self.attendance.clone(),
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn faculty(&self) -> &[Faculty] {
        &self.faculty
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn student_by_email(&self, email: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.email == email)
    }

    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    pub fn faculty_by_email(&self, email: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.email == email)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Returns every login credential: administrators first, then faculty, then students.
    pub fn credentials(&self) -> Vec<Credential> {
        let admins = self.faculty.iter().filter(|f| f.is_admin());
        let teachers = self.faculty.iter().filter(|f| !f.is_admin());

        admins
            .chain(teachers)
            .map(Credential::from)
            .chain(self.students.iter().map(Credential::from))
            .collect()
    }

    /// Inserts a new student. Fails if the ID or email is already taken.
    pub fn add_student(&mut self, student: Student) -> Result<(), StoreError> {
        if self.student(&student.id).is_some() {
            return Err(StoreError::DuplicateId {
                entity: Entity::Student,
                id: student.id,
            });
        }
        self.ensure_email_free(&student.email, None)?;

        info!("Added student {} ({})", student.id, student.name);
        self.students.push(student);

        Ok(())
    }

    /// Merges `update` into the student with the given ID and returns the updated row.
    pub fn update_student(
        &mut self,
        id: &str,
        update: StudentUpdate,
    ) -> Result<&Student, StoreError> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found(Entity::Student, id))?;

        if let Some(email) = &update.email {
            self.ensure_email_free(email, Some(id))?;
        }

        update.apply(&mut self.students[index]);
        info!("Updated student {id}");

        Ok(&self.students[index])
    }

    /// Removes and returns a student, along with every attendance record about them.
    pub fn delete_student(&mut self, id: &str) -> Result<Student, StoreError> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found(Entity::Student, id))?;

        let student = self.students.remove(index);

        let before = self.attendance.len();
        self.attendance.retain(|record| record.student_id != id);
        info!(
            "Deleted student {id} and {} of their attendance records",
            before - self.attendance.len()
        );

        Ok(student)
    }

    /// Inserts a new faculty member or administrator. Fails if the ID or email is already taken.
    pub fn add_faculty(&mut self, member: Faculty) -> Result<(), StoreError> {
        if self.faculty_member(&member.id).is_some() {
            return Err(StoreError::DuplicateId {
                entity: Entity::Faculty,
                id: member.id,
            });
        }
        self.ensure_email_free(&member.email, None)?;

        info!("Added faculty member {} ({})", member.id, member.name);
        self.faculty.push(member);

        Ok(())
    }

    /// Merges `update` into the faculty row with the given ID and returns the updated row.
    ///
    /// A faculty member who still teaches courses cannot be turned into an administrator, and the
    /// last administrator cannot be turned into a faculty member.
    pub fn update_faculty(
        &mut self,
        id: &str,
        update: FacultyUpdate,
    ) -> Result<&Faculty, StoreError> {
        let index = self
            .faculty
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| not_found(Entity::Faculty, id))?;

        if let Some(email) = &update.email {
            self.ensure_email_free(email, Some(id))?;
        }
        match update.position {
            Some(Position::Admin) => self.ensure_teaches_nothing(id)?,
            Some(Position::Faculty { .. }) if self.faculty[index].is_admin() => {
                self.ensure_not_last_admin(id)?;
            }
            _ => {}
        }

        update.apply(&mut self.faculty[index]);
        info!("Updated faculty member {id}");

        Ok(&self.faculty[index])
    }

    /// Removes and returns a faculty row. Fails while any course is still assigned to them, or if
    /// they are the last administrator.
    pub fn delete_faculty(&mut self, id: &str) -> Result<Faculty, StoreError> {
        let index = self
            .faculty
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| not_found(Entity::Faculty, id))?;

        self.ensure_teaches_nothing(id)?;
        if self.faculty[index].is_admin() {
            self.ensure_not_last_admin(id)?;
        }

        let member = self.faculty.remove(index);
        info!("Deleted faculty member {id}");

        Ok(member)
    }

    /// Inserts a new course, which must be taught by an existing faculty member.
    pub fn add_course(&mut self, course: Course) -> Result<(), StoreError> {
        if self.course(&course.id).is_some() {
            return Err(StoreError::DuplicateId {
                entity: Entity::Course,
                id: course.id,
            });
        }

        let teacher = self
            .faculty_member(&course.faculty_id)
            .ok_or_else(|| not_found(Entity::Faculty, &course.faculty_id))?;
        if teacher.is_admin() {
            return Err(StoreError::NotTeaching(teacher.id.clone()));
        }

        info!("Added course {} ({})", course.id, course.course_name);
        self.courses.push(course);

        Ok(())
    }

    /// Records attendance for one class of a course.
    ///
    /// Only students on the course's eligible roster are marked. Anyone else is skipped with a
    /// warning. Marking a student again for the same course and date overwrites their status.
    ///
    /// Returns the number of distinct students written. A student listed twice keeps the last
    /// status given.
    pub fn mark_attendance(
        &mut self,
        course_id: &str,
        date: NaiveDate,
        marks: &[(String, Status)],
        marked_by: &str,
    ) -> Result<usize, StoreError> {
        let course = self
            .course(course_id)
            .ok_or_else(|| not_found(Entity::Course, course_id))?;

        let roster: Vec<String> = stats::eligible_roster(&self.students, course)
            .into_iter()
            .map(|s| s.id.clone())
            .collect();

        let mut written = HashSet::new();
        for (student_id, status) in marks {
            if !roster.contains(student_id) {
                warn!("Tried to mark {student_id} as {status} in {course_id}, who is not on its roster");
                continue;
            }

            let existing = self.attendance.iter().position(|r| {
                r.student_id == *student_id && r.course_id == course_id && r.date == date
            });

            match existing {
                Some(index) => {
                    let record = &mut self.attendance[index];
                    record.status = *status;
                    record.marked_by = marked_by.to_string();
                }
                None => {
                    let id = next_id("A", self.attendance.iter().map(|r| r.id.as_str()))
                        .unwrap_or_else(|| format_id("A", 1));
                    self.attendance.push(AttendanceRecord {
                        id,
                        date,
                        student_id: student_id.clone(),
                        course_id: course_id.to_string(),
                        status: *status,
                        marked_by: marked_by.to_string(),
                    });
                }
            }

            written.insert(student_id.as_str());
        }

        let written = written.len();
        info!("{marked_by} marked {written} students in {course_id} on {date}");

        Ok(written)
    }

    /// The ID the next new student should receive, e.g. `S011` after `S010`.
    pub fn next_student_id(&self) -> Result<String, StoreError> {
        next_id("S", self.students.iter().map(|s| s.id.as_str()))
            .ok_or(StoreError::IdSequenceUnavailable(Entity::Student))
    }

    /// The ID the next new faculty member should receive, e.g. `F006` after `F005`.
    pub fn next_faculty_id(&self) -> Result<String, StoreError> {
        next_id("F", self.faculty.iter().map(|f| f.id.as_str()))
            .ok_or(StoreError::IdSequenceUnavailable(Entity::Faculty))
    }

    /// Appends an existing record, checking that it points at real rows.
    fn insert_record(&mut self, record: AttendanceRecord) -> Result<(), StoreError> {
        if self.attendance.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId {
                entity: Entity::Record,
                id: record.id,
            });
        }
        if self.student(&record.student_id).is_none() {
            return Err(not_found(Entity::Student, &record.student_id));
        }
        if self.course(&record.course_id).is_none() {
            return Err(not_found(Entity::Course, &record.course_id));
        }

        self.attendance.push(record);

        Ok(())
    }

    /// Emails are login keys, so they must be unique across students and faculty. `owner` is the
    /// ID allowed to keep the email it already has.
    fn ensure_email_free(&self, email: &str, owner: Option<&str>) -> Result<(), StoreError> {
        let taken = self
            .students
            .iter()
            .map(|s| (s.id.as_str(), s.email.as_str()))
            .chain(self.faculty.iter().map(|f| (f.id.as_str(), f.email.as_str())))
            .any(|(id, existing)| existing == email && Some(id) != owner);

        if taken {
            Err(StoreError::DuplicateEmail(email.to_string()))
        } else {
            Ok(())
        }
    }

    fn ensure_not_last_admin(&self, admin_id: &str) -> Result<(), StoreError> {
        if self.faculty.iter().any(|f| f.is_admin() && f.id != admin_id) {
            Ok(())
        } else {
            Err(StoreError::LastAdmin(admin_id.to_string()))
        }
    }

    fn ensure_teaches_nothing(&self, faculty_id: &str) -> Result<(), StoreError> {
        match self.courses.iter().find(|c| c.faculty_id == faculty_id) {
            Some(course) => Err(StoreError::InUse {
                entity: Entity::Faculty,
                id: faculty_id.to_string(),
                by: format!("course {}", course.id),
            }),
            None => Ok(()),
        }
    }
}

fn not_found(entity: Entity, id: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn format_id(prefix: &str, n: u32) -> String {
    format!("{prefix}{n:03}")
}

/// Continues the numbering of `ids`. IDs without `prefix` followed by a number are ignored, and
/// if none are left there is nothing to continue from.
fn next_id<'a>(prefix: &str, ids: impl Iterator<Item = &'a str>) -> Option<String> {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u32>().ok())
        .max()
        .map(|max| format_id(prefix, max + 1))
}
