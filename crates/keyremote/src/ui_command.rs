/// Commands sent to the main thread's event loop.
///
/// The main thread owns the hotkey registrations (the OS delivers hotkey
/// messages to the thread that registered them), so teardown and process
/// exit flow through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Unregister all global hotkeys. Sent when `Exit` fires.
    ReleaseHotkeys,
    /// Exit the event loop with status 0.
    Shutdown,
}
