use crate::{CoreError, CoreResult, Selector};

use std::panic::Location;

use error_location::ErrorLocation;

/// Where the player's controls live on the page.
///
/// The transport buttons are located by one selector and picked out by
/// position; the volume slider likewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLayout {
    /// Matches every transport button in the player bar.
    pub transport: Selector,
    /// Position of the previous-track button among `transport` matches.
    pub previous_index: usize,
    /// Position of the play/pause button among `transport` matches.
    pub play_pause_index: usize,
    /// Position of the next-track button among `transport` matches.
    pub next_index: usize,
    /// Matches the progress/volume slider handles.
    pub volume: Selector,
    /// Position of the volume handle among `volume` matches.
    pub volume_index: usize,
    /// Overlay to dismiss opportunistically (e.g. a cookie banner).
    pub overlay: Option<Selector>,
}

impl ControlLayout {
    /// Check that the transport indices are distinct.
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        let indices = [self.previous_index, self.play_pause_index, self.next_index];
        if indices[0] == indices[1] || indices[0] == indices[2] || indices[1] == indices[2] {
            return Err(CoreError::InvalidLayout {
                reason: format!(
                    "transport indices must be distinct (previous={}, play_pause={}, next={})",
                    self.previous_index, self.play_pause_index, self.next_index
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl Default for ControlLayout {
    fn default() -> Self {
        Self {
            transport: Selector::XPath(
                "//div[@class='player-controls__buttons']//button".to_string(),
            ),
            previous_index: 1,
            play_pause_index: 2,
            next_index: 3,
            volume: Selector::Css("button.middle-align.progress-bar__slider".to_string()),
            volume_index: 1,
            overlay: Some(Selector::Css("#onetrust-close-btn-container".to_string())),
        }
    }
}
