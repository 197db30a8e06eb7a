use anyhow::Result;
use log::info;
use std::path::Path;

pub mod auth;
pub mod cli;
pub mod dataset;
pub mod display;
pub mod error;
pub mod export;
pub mod mailer;
pub mod models;
pub mod settings;
pub mod shell;
pub mod stats;
pub mod store;

use crate::settings::Settings;
use crate::store::AttendanceStore;

/// Builds the store the binary starts with: the dataset at `dataset` if given, else the one named
/// in the settings, else the built-in demo institution.
pub fn create_default_store(
    settings: &Settings,
    dataset: Option<&Path>,
) -> Result<AttendanceStore> {
    match dataset.or(settings.dataset_path.as_deref()) {
        Some(path) => {
            info!("Loading dataset from {}", path.display());
            Ok(AttendanceStore::load(path)?)
        }
        None => {
            info!("Starting from the built-in demo dataset");
            Ok(AttendanceStore::seeded())
        }
    }
}
