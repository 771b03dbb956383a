mod config;

pub use config::{Config, GeocodingConfig, ScheduleConfig, TravelConfig};

use std::path::PathBuf;

/// Returns `~/.config/errandflow[-dev]/` based on ERRANDFLOW_ENV.
///
/// Set ERRANDFLOW_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ERRANDFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("errandflow-dev")
    } else {
        base_dir.join("errandflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
