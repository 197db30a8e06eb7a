use config::Config;
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration, read from `config.toml` and `EDUTRACK_*` environment variables.
///
/// Every field has a default, so neither source is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// A JSON dataset to start from instead of the built-in demo institution.
    pub dataset_path: Option<PathBuf>,
    /// How long the shell pauses before answering a login attempt.
    pub login_delay_ms: u64,
    /// Where credential exports are written.
    pub export_dir: PathBuf,
    pub mail: MailSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: None,
            login_delay_ms: 500,
            export_dir: PathBuf::from("exports"),
            mail: MailSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub sender: String,
    /// The address users are told to log in at.
    pub system_url: String,
    /// The directory composed messages are dropped into for the mail handler to pick up.
    pub outbox_dir: PathBuf,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            sender: "EduTrack Admin <admin@college.com>".to_string(),
            system_url: "http://localhost:5173".to_string(),
            outbox_dir: PathBuf::from("outbox"),
        }
    }
}

impl Settings {
    /// Loads settings from the config file `name` (any extension the `config` crate knows, e.g.
    /// `config` finds `config.toml`), then applies environment overrides such as
    /// `EDUTRACK_LOGIN_DELAY_MS` or `EDUTRACK_MAIL__SENDER`.
    pub fn load(name: &str) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("EDUTRACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
