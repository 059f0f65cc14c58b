//! Request bodies and response decoding for the W3C WebDriver wire protocol.

use crate::config::BrowserConfig;

use keyremote_core::{ElementHandle, Selector};
use serde_json::{Value, json};

/// Key under which W3C drivers return element references.
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// The WebDriver code point for the Enter key.
pub(crate) const ENTER_KEY: &str = "\u{E007}";

/// Session capabilities for a Firefox session.
pub(crate) fn capabilities(browser: &BrowserConfig) -> Value {
    let mut firefox_options = json!({});

    if let Some(binary) = &browser.binary_path {
        firefox_options["binary"] = json!(binary.to_string_lossy());
    }

    if browser.enable_drm {
        firefox_options["prefs"] = json!({
            "media.gmp-manager.updateEnabled": true,
            "media.eme.enabled": true,
        });
    }

    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "firefox",
                "moz:firefoxOptions": firefox_options,
            }
        }
    })
}

/// Body for the find-elements command.
pub(crate) fn locate(selector: &Selector) -> Value {
    json!({ "using": selector.strategy(), "value": selector.value() })
}

/// Element references from a find-elements response value.
pub(crate) fn element_handles(value: &Value) -> Vec<ElementHandle> {
    value
        .as_array()
        .map(|elements| {
            elements
                .iter()
                .filter_map(|element| element.get(ELEMENT_KEY)?.as_str())
                .map(ElementHandle::new)
                .collect()
        })
        .unwrap_or_default()
}

/// A pointer action sequence that presses on `handle`, moves by
/// `(dx, dy)`, and releases.
pub(crate) fn drag_actions(handle: &ElementHandle, dx: i32, dy: i32) -> Value {
    json!({
        "actions": [{
            "type": "pointer",
            "id": "keyremote-mouse",
            "parameters": { "pointerType": "mouse" },
            "actions": [
                {
                    "type": "pointerMove",
                    "duration": 0,
                    "origin": { ELEMENT_KEY: handle.as_str() },
                    "x": 0,
                    "y": 0,
                },
                { "type": "pointerDown", "button": 0 },
                {
                    "type": "pointerMove",
                    "duration": 0,
                    "origin": "pointer",
                    "x": dx,
                    "y": dy,
                },
                { "type": "pointerUp", "button": 0 },
            ],
        }]
    })
}

/// Human-readable message from an error response value.
pub(crate) fn error_message(value: &Value) -> String {
    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");

    match value.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => format!("{error}: {message}"),
        _ => error.to_string(),
    }
}

/// Port the WebDriver server listens on, for spawning it locally.
pub(crate) fn port(webdriver_url: &str) -> Option<u16> {
    reqwest::Url::parse(webdriver_url)
        .ok()?
        .port_or_known_default()
}
