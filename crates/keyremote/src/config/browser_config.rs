use crate::config::{DEFAULT_START_URL, DEFAULT_WEBDRIVER_URL};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Browser automation session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Browser executable. The driver's default browser is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<PathBuf>,
    /// WebDriver server executable to spawn (e.g. geckodriver). When absent
    /// a server is expected to be listening at `webdriver_url` already.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_binary: Option<PathBuf>,
    /// Base URL of the WebDriver server.
    pub webdriver_url: String,
    /// Page opened when the session starts.
    pub start_url: String,
    /// Extension installed temporarily after startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_path: Option<PathBuf>,
    /// Enable the browser preferences needed for DRM-protected playback.
    pub enable_drm: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            driver_binary: None,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            start_url: DEFAULT_START_URL.to_string(),
            extension_path: None,
            enable_drm: true,
        }
    }
}
