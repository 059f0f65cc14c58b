//! Translate normalized shortcut strings into `global-hotkey` chords.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use keyremote_core::Shortcut;

const LETTERS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

fn modifier(segment: &str) -> Option<Modifiers> {
    match segment {
        "alt" | "option" => Some(Modifiers::ALT),
        "ctrl" | "control" => Some(Modifiers::CONTROL),
        "shift" => Some(Modifiers::SHIFT),
        "super" | "meta" | "cmd" | "command" | "win" => Some(Modifiers::SUPER),
        _ => None,
    }
}

fn key(segment: &str) -> Option<Code> {
    let mut chars = segment.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return LETTERS.get(usize::from(c as u8 - b'a')).copied();
        }
        if c.is_ascii_digit() {
            return DIGITS.get(usize::from(c as u8 - b'0')).copied();
        }
    }

    if let Some(number) = segment.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return number.checked_sub(1).and_then(|i| FUNCTION_KEYS.get(i)).copied();
    }

    let code = match segment {
        "escape" | "esc" => Code::Escape,
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "backspace" => Code::Backspace,
        "delete" | "del" => Code::Delete,
        "insert" | "ins" => Code::Insert,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,
        "left" | "arrowleft" => Code::ArrowLeft,
        "right" | "arrowright" => Code::ArrowRight,
        "up" | "arrowup" => Code::ArrowUp,
        "down" | "arrowdown" => Code::ArrowDown,
        "comma" | "," => Code::Comma,
        "period" | "." => Code::Period,
        "slash" | "/" => Code::Slash,
        "semicolon" | ";" => Code::Semicolon,
        "minus" | "-" => Code::Minus,
        "equal" | "=" => Code::Equal,
        "mediaplaypause" => Code::MediaPlayPause,
        "medianexttrack" => Code::MediaTrackNext,
        "mediaprevioustrack" => Code::MediaTrackPrevious,
        "mediastop" => Code::MediaStop,
        "volumeup" => Code::AudioVolumeUp,
        "volumedown" => Code::AudioVolumeDown,
        "volumemute" => Code::AudioVolumeMute,
        _ => return None,
    };
    Some(code)
}

/// Parse a shortcut such as `alt+left` into a hotkey.
///
/// Accepts any number of modifiers and exactly one key, in any order.
#[track_caller]
pub fn parse_hotkey(shortcut: &Shortcut) -> AppResult<HotKey> {
    let mut modifiers = Modifiers::empty();
    let mut code = None;

    for segment in shortcut.segments() {
        if let Some(m) = modifier(segment) {
            modifiers |= m;
            continue;
        }

        let Some(parsed) = key(segment) else {
            return Err(AppError::HotkeyRegistrationFailed {
                reason: format!("Unknown key {segment:?} in shortcut {shortcut}"),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if code.replace(parsed).is_some() {
            return Err(AppError::HotkeyRegistrationFailed {
                reason: format!("Shortcut {shortcut} names more than one key"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    }

    let Some(code) = code else {
        return Err(AppError::HotkeyRegistrationFailed {
            reason: format!("Shortcut {shortcut} has no key"),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, code))
}
