//! Configuration loading for minihive.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Get the minihive home directory (~/.minihive).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".minihive"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.minihive/settings.json.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(&get_settings_path()?)
}

/// Load settings from an explicit path.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;
    validate_settings(&settings)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings or fall back to defaults when no file exists.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_else(|e| {
        tracing::debug!("Using default settings: {}", e);
        Settings::default()
    })
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.dispatch_timeout_seconds <= 0.0 {
        return Err(Error::Config(
            "dispatch_timeout_seconds must be positive".to_string(),
        ));
    }
    if settings.short_term_capacity == 0 {
        return Err(Error::Config(
            "short_term_capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// minihive settings.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    /// Deadline applied to every dispatched handler invocation.
    #[serde(default = "default_dispatch_timeout_seconds")]
    pub dispatch_timeout_seconds: f64,

    /// Capacity of each task agent's short-term store.
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,
}

fn default_dispatch_timeout_seconds() -> f64 {
    30.0
}

fn default_short_term_capacity() -> usize {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dispatch_timeout_seconds: default_dispatch_timeout_seconds(),
            short_term_capacity: default_short_term_capacity(),
        }
    }
}
