pub mod config;
pub mod plan;

use std::path::Path;

use errandflow_core::{Config, ConfigError};

/// Load from an explicit path, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
}
