use std::fmt;

/// A logical user intent, independent of the shortcut that triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    /// End the session.
    Exit,
    /// Skip to the previous track.
    Previous,
    /// Skip to the next track.
    Next,
    /// Toggle playback.
    PlayPause,
    /// Raise the volume by one step.
    VolumeUp,
    /// Lower the volume by one step.
    VolumeDown,
}

impl Command {
    /// Every command, in binding-table order.
    pub const ALL: [Command; 6] = [
        Command::Exit,
        Command::Previous,
        Command::Next,
        Command::PlayPause,
        Command::VolumeUp,
        Command::VolumeDown,
    ];

    /// Stable snake_case name, matching the configuration keys.
    pub fn name(self) -> &'static str {
        match self {
            Command::Exit => "exit",
            Command::Previous => "previous",
            Command::Next => "next",
            Command::PlayPause => "play_pause",
            Command::VolumeUp => "volume_up",
            Command::VolumeDown => "volume_down",
        }
    }

    /// Position in [`Command::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Command::Exit => 0,
            Command::Previous => 1,
            Command::Next => 2,
            Command::PlayPause => 3,
            Command::VolumeUp => 4,
            Command::VolumeDown => 5,
        }
    }

    // 0 is reserved for the empty slot.
    pub(crate) fn to_bits(self) -> u8 {
        self.index() as u8 + 1
    }

    pub(crate) fn from_bits(bits: u8) -> Option<Self> {
        let index = usize::from(bits).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
