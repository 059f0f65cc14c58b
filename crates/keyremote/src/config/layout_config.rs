use crate::AppResult;

use keyremote_core::{ControlLayout, Selector};
use serde::{Deserialize, Serialize};

/// An element selector as written in the config file:
/// `{ css = "..." }` or `{ xpath = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorConfig {
    /// CSS selector.
    Css(String),
    /// XPath expression.
    Xpath(String),
}

impl From<&SelectorConfig> for Selector {
    fn from(selector: &SelectorConfig) -> Self {
        match selector {
            SelectorConfig::Css(value) => Selector::Css(value.clone()),
            SelectorConfig::Xpath(value) => Selector::XPath(value.clone()),
        }
    }
}

impl From<&Selector> for SelectorConfig {
    fn from(selector: &Selector) -> Self {
        match selector {
            Selector::Css(value) => SelectorConfig::Css(value.clone()),
            Selector::XPath(value) => SelectorConfig::Xpath(value.clone()),
        }
    }
}

/// Page layout: where the player controls and login fields are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Matches all transport buttons.
    pub transport: SelectorConfig,
    /// Previous-track button position.
    pub previous_index: usize,
    /// Play/pause button position.
    pub play_pause_index: usize,
    /// Next-track button position.
    pub next_index: usize,
    /// Matches the slider handles.
    pub volume: SelectorConfig,
    /// Volume handle position.
    pub volume_index: usize,
    /// Overlay close button, dismissed when present. `false` turns
    /// dismissal off.
    #[serde(with = "overlay_setting")]
    pub overlay: Option<SelectorConfig>,
    /// Login form username field.
    pub login_username: SelectorConfig,
    /// Login form password field.
    pub login_password: SelectorConfig,
}

impl LayoutConfig {
    /// Validated control layout for the control core.
    #[track_caller]
    pub fn control_layout(&self) -> AppResult<ControlLayout> {
        let layout = ControlLayout {
            transport: (&self.transport).into(),
            previous_index: self.previous_index,
            play_pause_index: self.play_pause_index,
            next_index: self.next_index,
            volume: (&self.volume).into(),
            volume_index: self.volume_index,
            overlay: self.overlay.as_ref().map(Selector::from),
        };
        layout.validate()?;
        Ok(layout)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let layout = ControlLayout::default();
        Self {
            transport: (&layout.transport).into(),
            previous_index: layout.previous_index,
            play_pause_index: layout.play_pause_index,
            next_index: layout.next_index,
            volume: (&layout.volume).into(),
            volume_index: layout.volume_index,
            overlay: layout.overlay.as_ref().map(SelectorConfig::from),
            login_username: SelectorConfig::Css("#login-username".to_string()),
            login_password: SelectorConfig::Css("#login-password".to_string()),
        }
    }
}

// TOML has no null, so a disabled overlay is written as `overlay = false`.
// A missing key keeps the default selector.
mod overlay_setting {
    use super::SelectorConfig;

    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Setting {
        Enabled(bool),
        Selector(SelectorConfig),
    }

    pub(super) fn serialize<S: Serializer>(
        overlay: &Option<SelectorConfig>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match overlay {
            Some(selector) => selector.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SelectorConfig>, D::Error> {
        match Setting::deserialize(deserializer)? {
            Setting::Selector(selector) => Ok(Some(selector)),
            Setting::Enabled(false) => Ok(None),
            Setting::Enabled(true) => Err(D::Error::custom(
                "overlay must be a selector table or false",
            )),
        }
    }
}
