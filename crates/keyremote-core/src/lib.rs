//! keyremote core library
//!
//! The control engine of a keyboard remote for a browser-hosted media
//! player: a sticky single-slot command mailbox, the binding table, a narrow
//! page-driver trait, and the polling state machine that turns commands into
//! clicks and drags.
//!
//! # Example
//!
//! ```
//! use keyremote_core::{Command, EventTracker};
//!
//! let tracker = EventTracker::new();
//! tracker.fire(Command::Next);
//! tracker.fire(Command::PlayPause);
//! assert_eq!(tracker.take(), Some(Command::PlayPause));
//!
//! tracker.fire(Command::Exit);
//! tracker.clear();
//! assert_eq!(tracker.peek(), Some(Command::Exit));
//! ```

mod binding;
mod command;
mod control_loop;
mod driver;
mod error;
mod event_tracker;
mod layout;
mod loop_state;
mod resolver;

pub use {
    binding::{BindingTable, Shortcut, default_shortcut},
    command::Command,
    control_loop::{ControlLoop, DEFAULT_POLL_INTERVAL, DEFAULT_VOLUME_STEP, LoopSettings, Step},
    driver::{ContextId, ElementHandle, PageDriver, Selector},
    error::{CoreError, Result as CoreResult},
    event_tracker::EventTracker,
    layout::ControlLayout,
    loop_state::LoopState,
    resolver::{Action, Capability, ControlHandles, ControlResolver, Resolution},
};

#[cfg(test)]
mod tests;
