//! The control loop state machine.
//!
//! Each iteration checks for `Exit`, keeps the session's window focused,
//! re-resolves control handles when the page address changes, and dispatches
//! at most one pending command. Commands fired while the handles are not
//! valid are discarded.

use crate::{
    Action, Command, ContextId, ControlHandles, ControlLayout, ControlResolver, CoreError, CoreResult,
    EventTracker, LoopState, PageDriver, Resolution,
};

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, instrument, warn};

/// Default pause between iterations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default volume drag distance in pixels.
pub const DEFAULT_VOLUME_STEP: i32 = 10;

/// Tunables for the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Idle delay between iterations.
    pub poll_interval: Duration,
    /// Horizontal drag distance for one volume step.
    pub volume_step: i32,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            volume_step: DEFAULT_VOLUME_STEP,
        }
    }
}

/// Outcome of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep iterating.
    Continue,
    /// The page driver has been released.
    Terminated,
}

/// Drives a [`PageDriver`] from the commands in an [`EventTracker`].
///
/// Owns the driver exclusively; the hotkey side only ever touches the tracker.
pub struct ControlLoop<D: PageDriver> {
    driver: D,
    tracker: Arc<EventTracker>,
    layout: ControlLayout,
    settings: LoopSettings,
    home_context: ContextId,
    last_address: Option<String>,
    handles: Option<ControlHandles>,
    state: LoopState,
    faulted: bool,
}

impl<D: PageDriver> ControlLoop<D> {
    /// Create a loop bound to the driver's currently focused context.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid or the focused context
    /// cannot be read.
    #[instrument(skip_all)]
    pub async fn new(
        driver: D,
        tracker: Arc<EventTracker>,
        layout: ControlLayout,
        settings: LoopSettings,
    ) -> CoreResult<Self> {
        layout.validate()?;
        let home_context = driver.current_context().await?;

        info!(context = %home_context, "Control loop bound to session context");

        Ok(Self {
            driver,
            tracker,
            layout,
            settings,
            home_context,
            last_address: None,
            handles: None,
            state: LoopState::Initial,
            faulted: false,
        })
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether commands are currently dispatched.
    pub fn is_ready(&self) -> bool {
        self.state == LoopState::Ready && self.handles.is_some()
    }

    /// Iterate until `Exit` is observed and the driver is released.
    #[instrument(skip_all)]
    pub async fn run(mut self) {
        info!(
            poll_interval_ms = self.settings.poll_interval.as_millis(),
            "Control loop running"
        );

        while self.step().await == Step::Continue {
            tokio::time::sleep(self.settings.poll_interval).await;
        }

        info!("Control loop stopped");
    }

    /// Run one iteration.
    pub async fn step(&mut self) -> Step {
        if self.state == LoopState::Terminated {
            return Step::Terminated;
        }

        if self.tracker.exit_requested() {
            self.terminate().await;
            return Step::Terminated;
        }

        match self.refresh().await {
            Ok(()) => self.faulted = false,
            Err(e) => self.fault(&e),
        }

        let Some(command) = self.tracker.take() else {
            return Step::Continue;
        };

        if !self.is_ready() {
            debug!(command = %command, state = ?self.state, "Controls not ready, command discarded");
            return Step::Continue;
        }

        self.dispatch(command).await;
        Step::Continue
    }

    async fn refresh(&mut self) -> CoreResult<()> {
        let context = self.driver.current_context().await?;
        if context != self.home_context {
            debug!(from = %context, to = %self.home_context, "Restoring session context");
            self.driver.switch_context(&self.home_context).await?;
        }

        let address = self.driver.current_address().await?;
        if self.last_address.as_deref() == Some(address.as_str()) {
            return Ok(());
        }

        if self.state == LoopState::Ready {
            self.transition(LoopState::Stale);
        }
        self.handles = None;
        self.transition(LoopState::Resolving);
        self.last_address = Some(address.clone());

        let resolution = ControlResolver::new(&self.layout)
            .resolve(&self.driver)
            .await;

        // The overlay can hide the controls from clicks, so try it either way.
        if let Some(overlay) = &self.layout.overlay {
            if let Err(e) = self.driver.dismiss(overlay).await {
                debug!(error = %e, "Overlay dismissal failed, ignoring");
            }
        }

        match resolution? {
            Resolution::Found(handles) => {
                self.handles = Some(handles);
                self.transition(LoopState::Ready);
                info!(address = %address, "Controls resolved");
            }
            Resolution::NotFound { missing } => {
                self.transition(LoopState::Stale);
                debug!(address = %address, missing = ?missing, "Controls not found");
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, command: Command) {
        let Some(handles) = &self.handles else {
            return;
        };
        let Some(action) = handles.action_for(command, self.settings.volume_step) else {
            return;
        };

        let result = match action {
            Action::Click(handle) => self.driver.click(handle).await,
            Action::Drag { handle, dx } => self.driver.drag_by(handle, dx, 0).await,
        };

        match result {
            Ok(()) => info!(command = %command, "Command dispatched"),
            Err(e) => {
                warn!(command = %command, error = %e, "Dispatch failed, re-resolving controls");
                self.invalidate();
            }
        }
    }

    fn fault(&mut self, error: &CoreError) {
        if self.faulted {
            debug!(error = %error, "Page driver still failing");
        } else {
            warn!(error = %error, "Page driver failed, controls invalidated");
        }
        self.faulted = true;
        self.invalidate();
    }

    // Forgetting the address forces a fresh resolution on the next iteration.
    fn invalidate(&mut self) {
        self.handles = None;
        self.last_address = None;
        if self.state != LoopState::Initial {
            self.transition(LoopState::Stale);
        }
    }

    async fn terminate(&mut self) {
        self.transition(LoopState::Terminating);
        self.handles = None;

        if let Err(e) = self.driver.release().await {
            warn!(error = %e, "Failed to release page driver");
        }

        self.transition(LoopState::Terminated);
        info!("Page driver released");
    }

    fn transition(&mut self, next: LoopState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "State transition");
            self.state = next;
        }
    }
}
