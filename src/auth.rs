use crate::error::AuthError;
use crate::models::User;
use crate::store::AttendanceStore;
use log::{debug, info};
use rand::{Rng, thread_rng};

const PASSWORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const PASSWORD_LENGTH: usize = 8;

/// A random password of lowercase letters and digits, handed out to new accounts that were
/// not given one.
pub fn generate_password() -> String {
    let mut rng = thread_rng();
    (0..PASSWORD_LENGTH)
        .map(|_| char::from(PASSWORD_CHARS[rng.gen_range(0..PASSWORD_CHARS.len())]))
        .collect()
}

/// Looks up an exact, case-sensitive `(email, password)` match among the store's credentials.
pub fn authenticate(
    store: &AttendanceStore,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    store
        .credentials()
        .into_iter()
        .find(|c| c.email == email && c.password == password)
        .map(User::from)
        .ok_or_else(|| {
            debug!("Rejected login attempt for {email}");
            AuthError::InvalidCredentials
        })
}

/// Who, if anyone, is using the running instance. There is at most one identity at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(User),
}

impl Session {
    /// Authenticates and, on success, makes the new user the active identity, replacing any
    /// previous one. A failed attempt leaves the session as it was.
    pub fn login(
        &mut self,
        store: &AttendanceStore,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user = authenticate(store, email, password)?;
        info!("{} logged in as {}", user.email, user.role());

        *self = Session::LoggedIn(user.clone());
        Ok(user)
    }

    /// Ends the session unconditionally, returning whoever was logged in.
    pub fn logout(&mut self) -> Option<User> {
        match std::mem::take(self) {
            Session::LoggedIn(user) => {
                info!("{} logged out", user.email);
                Some(user)
            }
            Session::LoggedOut => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::LoggedIn(user) => Some(user),
            Session::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, Profile, Role};

    #[test]
    fn generated_passwords_are_short_lowercase_alphanumerics() {
        for _ in 0..50 {
            let password = generate_password();
            assert_eq!(password.len(), 8);
            assert!(
                password
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn seeded_accounts_authenticate() {
        let store = AttendanceStore::seeded();

        let admin = authenticate(&store, "admin@college.com", "admin123").unwrap();
        assert_eq!(admin.role(), Role::Admin);
        assert_eq!(admin.name, "Dr. Admin");

        let rao = authenticate(&store, "arao@college.com", "prof123").unwrap();
        assert_eq!(
            rao.profile,
            Profile::Faculty {
                id: "F001".to_string(),
                branch: Branch::Cse
            }
        );

        let alice = authenticate(&store, "alice@demo.com", "alice123").unwrap();
        assert_eq!(alice.role(), Role::Student);
    }

    #[test]
    fn mismatches_are_indistinguishable() {
        let store = AttendanceStore::seeded();

        let wrong_password = authenticate(&store, "alice@demo.com", "bob123");
        let unknown_email = authenticate(&store, "nobody@demo.com", "alice123");
        assert_eq!(wrong_password, Err(AuthError::InvalidCredentials));
        assert_eq!(unknown_email, wrong_password);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let store = AttendanceStore::seeded();
        assert!(authenticate(&store, "Alice@demo.com", "alice123").is_err());
        assert!(authenticate(&store, "alice@demo.com", "ALICE123").is_err());
    }

    #[test]
    fn session_moves_between_states() {
        let store = AttendanceStore::seeded();
        let mut session = Session::default();
        assert!(!session.is_logged_in());

        assert!(session.login(&store, "alice@demo.com", "nope").is_err());
        assert_eq!(session, Session::LoggedOut);

        session.login(&store, "alice@demo.com", "alice123").unwrap();
        assert_eq!(session.user().unwrap().name, "Alice Kumar");

        session.login(&store, "bob@demo.com", "bob123").unwrap();
        assert_eq!(session.user().unwrap().name, "Bob Singh");

        // A failed attempt keeps the current identity.
        assert!(session.login(&store, "bob@demo.com", "wrong").is_err());
        assert_eq!(session.user().unwrap().name, "Bob Singh");

        assert_eq!(session.logout().unwrap().email, "bob@demo.com");
        assert_eq!(session.logout(), None);
        assert!(!session.is_logged_in());
    }
}
