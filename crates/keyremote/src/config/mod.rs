mod account_config;
mod bindings_config;
mod browser_config;
#[allow(clippy::module_inception)]
mod config;
mod control_config;
mod layout_config;

pub(crate) use {
    account_config::AccountConfig,
    bindings_config::BindingsConfig,
    browser_config::BrowserConfig,
    config::Config,
    control_config::ControlConfig,
    layout_config::{LayoutConfig, SelectorConfig},
};

pub(crate) const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub(crate) const DEFAULT_START_URL: &str =
    "https://accounts.spotify.com/en/login?continue=https:%2F%2Fopen.spotify.com%2F";

/// Environment variable that overrides the config file location.
pub(crate) const CONFIG_PATH_ENV: &str = "KEYREMOTE_CONFIG";
