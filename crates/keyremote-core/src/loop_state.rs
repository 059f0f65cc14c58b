/// Control loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No handles resolved yet.
    Initial,
    /// Page context changed; locating controls.
    Resolving,
    /// Handles are valid and commands are dispatched.
    Ready,
    /// Context changed since the last `Ready`, or resolution failed.
    Stale,
    /// `Exit` observed; releasing the page driver.
    Terminating,
    /// Page driver released. Nothing further happens.
    Terminated,
}
