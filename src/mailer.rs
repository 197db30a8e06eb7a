//! Composes the email that tells a user their login credentials.
//!
//! Nothing here talks to a mail server. The composed message is dropped into an outbox directory
//! as an `.eml` file, and whatever mail handler the platform runs takes it from there.

use crate::models::Credential;
use crate::settings::MailSettings;
use anyhow::{Context, Result};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

pub const SUBJECT: &str = "Your EduTrack Login Credentials";

/// The plain-text body of a credentials email.
pub fn credentials_body(credential: &Credential, system_url: &str) -> String {
    format!(
        "Dear {name},\n\
         \n\
         Your login credentials for EduTrack Attendance Management System:\n\
         \n\
         Email: {email}\n\
         Password: {password}\n\
         Role: {role}\n\
         \n\
         Please keep these credentials secure and do not share them with anyone.\n\
         \n\
         You can access the system at: {system_url}\n\
         \n\
         Best regards,\n\
         EduTrack Admin Team",
        name = credential.name,
        email = credential.email,
        password = credential.password,
        role = credential.role(),
    )
}

pub fn compose_credentials_email(
    credential: &Credential,
    settings: &MailSettings,
) -> Result<Message> {
    let from: Mailbox = settings
        .sender
        .parse()
        .with_context(|| format!("invalid sender address '{}'", settings.sender))?;
    let to = Mailbox::new(
        Some(credential.name.clone()),
        credential
            .email
            .parse()
            .with_context(|| format!("invalid recipient address '{}'", credential.email))?,
    );

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(credentials_body(credential, &settings.system_url))?;

    Ok(message)
}

/// Composes the credentials email and writes it to `<outbox_dir>/<id>.eml`.
pub fn queue_credentials_email(
    credential: &Credential,
    settings: &MailSettings,
) -> Result<PathBuf> {
    let message = compose_credentials_email(credential, settings)?;

    fs::create_dir_all(&settings.outbox_dir)?;
    let path = settings.outbox_dir.join(format!("{}.eml", credential.id));
    fs::write(&path, message.formatted())?;

    info!(
        "Queued credentials email for {} at {}",
        credential.email,
        path.display()
    );

    Ok(path)
}

/// Like [`queue_credentials_email`], but a failure is only logged. Notifying a user must never
/// get in the way of managing the roster.
pub fn notify(credential: &Credential, settings: &MailSettings) -> Option<PathBuf> {
    queue_credentials_email(credential, settings)
        .inspect_err(|e| {
            warn!(
                "Could not queue credentials email for {}: {e:#}",
                credential.email
            )
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AttendanceStore;

    fn alice() -> Credential {
        let store = AttendanceStore::seeded();
        Credential::from(store.student("S001").unwrap())
    }

    fn settings(outbox: PathBuf) -> MailSettings {
        MailSettings {
            outbox_dir: outbox,
            ..Default::default()
        }
    }

    #[test]
    fn body_embeds_every_detail() {
        let body = credentials_body(&alice(), "https://edutrack.example");

        assert!(body.starts_with("Dear Alice Kumar,"));
        assert!(body.contains("Email: alice@demo.com\n"));
        assert!(body.contains("Password: alice123\n"));
        assert!(body.contains("Role: Student\n"));
        assert!(body.contains("You can access the system at: https://edutrack.example"));
        assert!(body.ends_with("EduTrack Admin Team"));
    }

    #[test]
    fn queued_message_lands_in_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path().join("outbox"));

        let path = queue_credentials_email(&alice(), &settings).unwrap();
        assert_eq!(path, dir.path().join("outbox").join("S001.eml"));

        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("Subject: Your EduTrack Login Credentials"));
        assert!(raw.contains("alice@demo.com"));
    }

    #[test]
    fn bad_sender_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let settings = MailSettings {
            sender: "not an address".to_string(),
            ..settings(dir.path().to_path_buf())
        };

        assert!(compose_credentials_email(&alice(), &settings).is_err());
        assert_eq!(notify(&alice(), &settings), None);
    }
}
