use crate::AppResult;

use keyremote_core::{BindingTable, Command, default_shortcut};
use serde::{Deserialize, Serialize};

/// Shortcut per command. Each entry falls back to its default independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    /// Ends the session.
    pub exit: String,
    /// Previous track.
    pub previous: String,
    /// Next track.
    pub next: String,
    /// Toggle playback.
    pub play_pause: String,
    /// Volume up one step.
    pub volume_up: String,
    /// Volume down one step.
    pub volume_down: String,
}

impl BindingsConfig {
    /// Build the immutable binding table.
    #[track_caller]
    pub fn table(&self) -> AppResult<BindingTable> {
        let table = BindingTable::with_overrides(Command::ALL.map(|command| {
            let spec = match command {
                Command::Exit => &self.exit,
                Command::Previous => &self.previous,
                Command::Next => &self.next,
                Command::PlayPause => &self.play_pause,
                Command::VolumeUp => &self.volume_up,
                Command::VolumeDown => &self.volume_down,
            };
            (command, spec.as_str())
        }))?;
        Ok(table)
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            exit: default_shortcut(Command::Exit).to_string(),
            previous: default_shortcut(Command::Previous).to_string(),
            next: default_shortcut(Command::Next).to_string(),
            play_pause: default_shortcut(Command::PlayPause).to_string(),
            volume_up: default_shortcut(Command::VolumeUp).to_string(),
            volume_down: default_shortcut(Command::VolumeDown).to_string(),
        }
    }
}
