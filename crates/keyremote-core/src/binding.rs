//! Immutable command-to-shortcut bindings.

use crate::{Command, CoreError, CoreResult};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;

/// A normalized shortcut specification such as `alt+left`.
///
/// Normalization lowercases the text, strips whitespace, maps modifier
/// aliases to one name and puts modifiers first in a fixed order, so
/// `"Left + Alt"`, `"option+left"` and `"alt+left"` compare equal. Parsing
/// into an OS-level key chord is left to the hotkey facility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut(String);

impl Shortcut {
    /// Normalize and validate a shortcut string for `command`.
    #[track_caller]
    pub fn new(command: Command, spec: &str) -> CoreResult<Self> {
        let normalized: String = spec
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if normalized.is_empty() {
            return Err(CoreError::InvalidBinding {
                command,
                reason: "shortcut is empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if normalized.split('+').any(str::is_empty) {
            return Err(CoreError::InvalidBinding {
                command,
                reason: format!("shortcut {spec:?} has an empty key segment"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut segments: Vec<&str> = normalized
            .split('+')
            .map(|segment| canonical_modifier(segment).unwrap_or(segment))
            .collect();
        // Stable, so the non-modifier segments keep their order.
        segments.sort_by_key(|segment| modifier_rank(segment));
        segments.dedup_by(|a, b| *a == *b && canonical_modifier(*a).is_some());

        Ok(Self(segments.join("+")))
    }

    /// The normalized specification.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `+`-separated key segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('+')
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const MODIFIER_ORDER: [&str; 4] = ["ctrl", "alt", "shift", "super"];

fn canonical_modifier(segment: &str) -> Option<&'static str> {
    match segment {
        "ctrl" | "control" => Some("ctrl"),
        "alt" | "option" => Some("alt"),
        "shift" => Some("shift"),
        "super" | "meta" | "cmd" | "command" | "win" => Some("super"),
        _ => None,
    }
}

fn modifier_rank(segment: &str) -> usize {
    MODIFIER_ORDER
        .iter()
        .position(|modifier| *modifier == segment)
        .unwrap_or(MODIFIER_ORDER.len())
}

/// Default shortcut for each command.
pub fn default_shortcut(command: Command) -> &'static str {
    match command {
        Command::Exit => "alt+escape",
        Command::Previous => "alt+left",
        Command::Next => "alt+right",
        Command::PlayPause => "alt+space",
        Command::VolumeUp => "alt+up",
        Command::VolumeDown => "alt+down",
    }
}

/// One shortcut per command, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    shortcuts: [Shortcut; 6],
}

impl BindingTable {
    /// Build a table from the default shortcuts.
    pub fn defaults() -> Self {
        Self {
            shortcuts: Command::ALL.map(|command| Shortcut(default_shortcut(command).to_string())),
        }
    }

    /// Build a table from defaults with the given overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBinding`] if a shortcut is malformed or
    /// the same shortcut ends up bound to two commands.
    #[track_caller]
    pub fn with_overrides<'a, I>(overrides: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (Command, &'a str)>,
    {
        let mut table = Self::defaults();
        for (command, spec) in overrides {
            table.shortcuts[command.index()] = Shortcut::new(command, spec)?;
        }

        for (i, command) in Command::ALL.iter().enumerate() {
            let shortcut = &table.shortcuts[command.index()];
            if let Some(other) = Command::ALL[..i]
                .iter()
                .find(|other| table.shortcuts[other.index()] == *shortcut)
            {
                return Err(CoreError::InvalidBinding {
                    command: *command,
                    reason: format!("{shortcut} is already bound to {other}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(table)
    }

    /// Shortcut bound to `command`.
    pub fn get(&self, command: Command) -> &Shortcut {
        &self.shortcuts[command.index()]
    }

    /// All bindings in [`Command::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Command, &Shortcut)> {
        Command::ALL.into_iter().map(|command| (command, self.get(command)))
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::defaults()
    }
}
