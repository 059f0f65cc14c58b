//! Global hotkey registration and event forwarding.
//!
//! Registration happens on the main thread (the `tao` event loop pumps the
//! messages `global-hotkey` needs on Windows and macOS). The listener itself
//! is `Send` and forwards presses into the [`EventTracker`] from the async
//! runtime thread.

use crate::{AppError, AppResult, hotkey_chord::parse_hotkey};

use std::{collections::HashMap, panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use keyremote_core::{BindingTable, Command, EventTracker};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Live OS hotkey registrations. Must stay on the thread that created it.
pub struct HotkeyRegistration {
    manager: GlobalHotKeyManager,
    hotkeys: Vec<HotKey>,
    commands: HashMap<u32, Command>,
}

impl HotkeyRegistration {
    /// Register one global hotkey per binding.
    ///
    /// The OS grab consumes the key combination, so the focused application
    /// never sees it. On Wayland without X11 no global grab is available and
    /// this fails.
    #[track_caller]
    #[instrument(skip(bindings))]
    pub fn register(bindings: &BindingTable) -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut hotkeys = Vec::new();
        let mut commands = HashMap::new();

        for (command, shortcut) in bindings.iter() {
            let hotkey = parse_hotkey(shortcut)?;

            manager
                .register(hotkey)
                .map_err(|e| AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to register {} for {}: {}", shortcut, command, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            debug!(command = %command, shortcut = %shortcut, "Global hotkey registered");
            hotkeys.push(hotkey);
            commands.insert(hotkey.id(), command);
        }

        info!(count = hotkeys.len(), "Global hotkeys registered");

        Ok(Self {
            manager,
            hotkeys,
            commands,
        })
    }

    /// Hotkey id to command map for the listener.
    pub fn commands(&self) -> HashMap<u32, Command> {
        self.commands.clone()
    }

    /// Remove every registration made by [`register`](Self::register).
    #[track_caller]
    pub fn unregister_all(self) -> AppResult<()> {
        self.manager
            .unregister_all(&self.hotkeys)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to unregister hotkeys: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("Global hotkeys unregistered");
        Ok(())
    }
}

/// Forwards hotkey presses into the event tracker.
pub struct HotkeyListener {
    commands: HashMap<u32, Command>,
    tracker: Arc<EventTracker>,
}

impl HotkeyListener {
    /// Create a listener for previously registered hotkeys.
    pub fn new(commands: HashMap<u32, Command>, tracker: Arc<EventTracker>) -> Self {
        Self { commands, tracker }
    }

    /// The command bound to hotkey `id`, for presses only.
    pub fn command_for(&self, id: u32, state: HotKeyState) -> Option<Command> {
        match state {
            HotKeyState::Pressed => self.commands.get(&id).copied(),
            HotKeyState::Released => None,
        }
    }

    /// Deliver a hotkey event. Never blocks.
    pub fn handle_event(&self, id: u32, state: HotKeyState) {
        if let Some(command) = self.command_for(id, state) {
            self.tracker.fire(command);
        }
    }

    /// Forward hotkey events until a shutdown signal is received.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // GlobalHotKeyEvent::receiver() returns a crossbeam_channel::Receiver
        // which has blocking recv() -- zero polling, one thread.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey listener shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    self.handle_event(event.id, event.state);
                }
            }
        }

        drop(event_rx);

        // The blocking task may be stuck in recv() until another hotkey
        // arrives; the runtime cleans it up on exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }
}
