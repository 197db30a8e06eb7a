use std::fmt;

/// The kinds of rows the store holds, used to say which collection an error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Student,
    Faculty,
    Course,
    Record,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Student => f.write_str("student"),
            Entity::Faculty => f.write_str("faculty member"),
            Entity::Course => f.write_str("course"),
            Entity::Record => f.write_str("attendance record"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { entity: Entity, id: String },
    DuplicateId { entity: Entity, id: String },
    DuplicateEmail(String),
    /// The row is still referenced by `by` and cannot be removed or repurposed.
    InUse { entity: Entity, id: String, by: String },
    /// A course was assigned to someone who does not hold a teaching position.
    NotTeaching(String),
    /// The next id cannot be derived because no existing id carries a numeric suffix.
    IdSequenceUnavailable(Entity),
    /// The change would leave the institution without any administrator.
    LastAdmin(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { entity, id } => write!(f, "No {entity} with ID '{id}'"),
            StoreError::DuplicateId { entity, id } => {
                write!(f, "A {entity} with ID '{id}' already exists")
            }
            StoreError::DuplicateEmail(email) => {
                write!(f, "The email '{email}' is already used by another account")
            }
            StoreError::InUse { entity, id, by } => {
                write!(f, "The {entity} '{id}' is still referenced by {by}")
            }
            StoreError::NotTeaching(id) => {
                write!(f, "'{id}' is not a faculty member and cannot teach a course")
            }
            StoreError::IdSequenceUnavailable(entity) => write!(
                f,
                "Cannot derive a new {entity} ID: there are no existing numbered IDs to continue from"
            ),
            StoreError::LastAdmin(id) => {
                write!(f, "'{id}' is the only administrator and must remain one")
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Either the email is unknown or the password is wrong. Deliberately not told apart.
    InvalidCredentials,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => {
                f.write_str("Invalid email or password. Please check your credentials.")
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(StoreError),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "Could not read dataset: {e}"),
            DatasetError::Parse(e) => write!(f, "Could not parse dataset: {e}"),
            DatasetError::Invalid(e) => write!(f, "Dataset is inconsistent: {e}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            DatasetError::Parse(e) => Some(e),
            DatasetError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError::Io(e)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> Self {
        DatasetError::Parse(e)
    }
}

impl From<StoreError> for DatasetError {
    fn from(e: StoreError) -> Self {
        DatasetError::Invalid(e)
    }
}
