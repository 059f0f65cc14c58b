use std::time::Duration;

use keyremote_core::{DEFAULT_POLL_INTERVAL, DEFAULT_VOLUME_STEP, LoopSettings};
use serde::{Deserialize, Serialize};

/// Control loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Idle delay between loop iterations, in milliseconds.
    pub poll_interval_ms: u64,
    /// Volume slider drag distance per step, in pixels.
    pub volume_step: i32,
}

impl ControlConfig {
    /// Loop settings for the control core.
    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            volume_step: self.volume_step.saturating_abs().max(1),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(u64::MAX),
            volume_step: DEFAULT_VOLUME_STEP,
        }
    }
}
