//! Configuration management for keyremote.
//!
//! Loads the TOML settings file from the platform config directory (or the
//! path in `KEYREMOTE_CONFIG`), fills anything missing with defaults, and
//! reports keys it does not recognise without failing on them.

use crate::{
    AppError, AppResult,
    config::{
        AccountConfig, BindingsConfig, BrowserConfig, CONFIG_PATH_ENV, ControlConfig,
        LayoutConfig,
    },
};

use std::{
    env, fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Known keys per section, used to report unrecognised settings.
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    (
        "browser",
        &[
            "binary_path",
            "driver_binary",
            "webdriver_url",
            "start_url",
            "extension_path",
            "enable_drm",
        ],
    ),
    ("account", &["username", "password"]),
    (
        "bindings",
        &[
            "exit",
            "previous",
            "next",
            "play_pause",
            "volume_up",
            "volume_down",
        ],
    ),
    ("control", &["poll_interval_ms", "volume_step"]),
    (
        "layout",
        &[
            "transport",
            "previous_index",
            "play_pause_index",
            "next_index",
            "volume",
            "volume_index",
            "overlay",
            "login_username",
            "login_password",
        ],
    ),
];

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Browser automation session.
    pub browser: BrowserConfig,
    /// Login autofill credentials.
    pub account: AccountConfig,
    /// Command shortcuts.
    pub bindings: BindingsConfig,
    /// Control loop tuning.
    pub control: ControlConfig,
    /// Page layout selectors.
    pub layout: LayoutConfig,
}

impl Config {
    /// Load configuration from disk, creating a default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config {}: {}", config_path.display(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config = Self::from_toml_str(&contents)?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Parse configuration text, warning about unrecognised keys.
    #[track_caller]
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let table: toml::Table = toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        for key in Self::unknown_keys(&table) {
            warn!(key = %key, "Unexpected setting ignored");
        }

        toml::Value::Table(table).try_into().map_err(|e| AppError::ConfigError {
            reason: format!("Invalid config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Dotted paths of keys that no section defines.
    pub fn unknown_keys(table: &toml::Table) -> Vec<String> {
        let mut unknown = Vec::new();

        for (section, value) in table {
            let Some((_, known)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
                unknown.push(section.clone());
                continue;
            };

            if let Some(entries) = value.as_table() {
                unknown.extend(
                    entries
                        .keys()
                        .filter(|key| !known.contains(&key.as_str()))
                        .map(|key| format!("{section}.{key}")),
                );
            }
        }

        unknown
    }

    /// Save configuration to `config_path` using an atomic write.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config_dir = config_path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(config_dir) = config_dir {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                debug!(config_dir = ?config_dir, "Created config directory");
            }
        }

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = ProjectDirs::from("com", "keyremote", "KeyRemote").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
