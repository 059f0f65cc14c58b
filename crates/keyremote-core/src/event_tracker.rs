//! Single-slot mailbox between the hotkey listener and the control loop.
//!
//! The listener fires commands from its own thread while the control loop
//! polls the slot. The slot is an atomic byte: 0 is empty, anything else is
//! an encoded [`Command`]. Last write wins, except that `Exit` is sticky:
//! once stored it can never be overwritten or cleared.

use crate::Command;

use std::{
    fmt,
    sync::atomic::{AtomicU8, Ordering},
};

use tracing::{debug, info};

const EMPTY: u8 = 0;

type ExitHook = Box<dyn Fn() + Send + Sync>;

/// Pending-command slot shared between the listener and the control loop.
pub struct EventTracker {
    slot: AtomicU8,
    on_exit: Option<ExitHook>,
}

impl EventTracker {
    /// Create an empty tracker with no exit hook.
    pub fn new() -> Self {
        Self {
            slot: AtomicU8::new(EMPTY),
            on_exit: None,
        }
    }

    /// Create an empty tracker that runs `hook` the first time `Exit` fires.
    ///
    /// The hook runs on the firing thread and must not block. It is used to
    /// tear down the hotkey registrations.
    pub fn with_exit_hook<F>(hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            slot: AtomicU8::new(EMPTY),
            on_exit: Some(Box::new(hook)),
        }
    }

    /// Store `command` in the slot, replacing any pending non-exit command.
    pub fn fire(&self, command: Command) {
        let exit = Command::Exit.to_bits();
        let stored = self
            .slot
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != exit).then_some(command.to_bits())
            });

        match stored {
            Ok(_) if command == Command::Exit => {
                info!("Exit requested");
                if let Some(hook) = &self.on_exit {
                    hook();
                }
            }
            Ok(previous) => {
                debug!(
                    command = %command,
                    replaced = ?Command::from_bits(previous),
                    "Command fired"
                );
            }
            Err(_) => debug!(command = %command, "Exit pending, command ignored"),
        }
    }

    /// Empty the slot unless it holds `Exit`.
    pub fn clear(&self) {
        let _ = self.take();
    }

    /// Current slot value, without side effects.
    pub fn peek(&self) -> Option<Command> {
        Command::from_bits(self.slot.load(Ordering::Acquire))
    }

    /// Remove and return the pending command unless it is `Exit`.
    ///
    /// Returns `None` when the slot is empty or holds `Exit`; in the latter
    /// case the slot is left untouched.
    pub fn take(&self) -> Option<Command> {
        let exit = Command::Exit.to_bits();
        self.slot
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != exit && current != EMPTY).then_some(EMPTY)
            })
            .ok()
            .and_then(Command::from_bits)
    }

    /// Whether `Exit` has been fired.
    pub fn exit_requested(&self) -> bool {
        self.peek() == Some(Command::Exit)
    }
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTracker")
            .field("pending", &self.peek())
            .field("has_exit_hook", &self.on_exit.is_some())
            .finish()
    }
}
