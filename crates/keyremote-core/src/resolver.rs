//! Resolve control handles from the current page content.

use crate::{Command, ControlLayout, CoreResult, ElementHandle, PageDriver};

use std::fmt;

use tracing::{debug, instrument};

/// A control the dispatch table needs a handle for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Previous-track button.
    Previous,
    /// Play/pause button.
    PlayPause,
    /// Next-track button.
    Next,
    /// Volume slider handle.
    Volume,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Previous => "previous",
            Capability::PlayPause => "play_pause",
            Capability::Next => "next",
            Capability::Volume => "volume",
        })
    }
}

/// A complete set of handles resolved from one page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlHandles {
    /// Previous-track button.
    pub previous: ElementHandle,
    /// Play/pause button.
    pub play_pause: ElementHandle,
    /// Next-track button.
    pub next: ElementHandle,
    /// Volume slider handle.
    pub volume: ElementHandle,
}

/// What a command does to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Click a control.
    Click(&'a ElementHandle),
    /// Drag a control horizontally by `dx` pixels.
    Drag {
        /// Control to drag.
        handle: &'a ElementHandle,
        /// Horizontal offset in pixels.
        dx: i32,
    },
}

impl ControlHandles {
    /// Dispatch table: the action for `command`, or `None` for `Exit`.
    pub fn action_for(&self, command: Command, volume_step: i32) -> Option<Action<'_>> {
        match command {
            Command::Exit => None,
            Command::Previous => Some(Action::Click(&self.previous)),
            Command::Next => Some(Action::Click(&self.next)),
            Command::PlayPause => Some(Action::Click(&self.play_pause)),
            Command::VolumeUp => Some(Action::Drag {
                handle: &self.volume,
                dx: volume_step,
            }),
            Command::VolumeDown => Some(Action::Drag {
                handle: &self.volume,
                dx: -volume_step,
            }),
        }
    }
}

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every required control was found.
    Found(ControlHandles),
    /// At least one control is missing.
    NotFound {
        /// Controls that could not be located.
        missing: Vec<Capability>,
    },
}

/// Locates the controls described by a [`ControlLayout`].
#[derive(Debug, Clone, Copy)]
pub struct ControlResolver<'a> {
    layout: &'a ControlLayout,
}

impl<'a> ControlResolver<'a> {
    /// Create a resolver for `layout`.
    pub fn new(layout: &'a ControlLayout) -> Self {
        Self { layout }
    }

    /// Query the page and pick out each control.
    ///
    /// # Errors
    ///
    /// Only driver failures are errors; absent controls yield
    /// [`Resolution::NotFound`].
    #[instrument(skip(self, driver))]
    pub async fn resolve<D: PageDriver + ?Sized>(&self, driver: &D) -> CoreResult<Resolution> {
        let buttons = driver.find_controls(&self.layout.transport).await?;
        let sliders = driver.find_controls(&self.layout.volume).await?;

        debug!(
            buttons = buttons.len(),
            sliders = sliders.len(),
            "Controls queried"
        );

        let previous = buttons.get(self.layout.previous_index);
        let play_pause = buttons.get(self.layout.play_pause_index);
        let next = buttons.get(self.layout.next_index);
        let volume = sliders.get(self.layout.volume_index);

        match (previous, play_pause, next, volume) {
            (Some(previous), Some(play_pause), Some(next), Some(volume)) => {
                Ok(Resolution::Found(ControlHandles {
                    previous: previous.clone(),
                    play_pause: play_pause.clone(),
                    next: next.clone(),
                    volume: volume.clone(),
                }))
            }
            _ => {
                let missing = [
                    (Capability::Previous, previous.is_none()),
                    (Capability::PlayPause, play_pause.is_none()),
                    (Capability::Next, next.is_none()),
                    (Capability::Volume, volume.is_none()),
                ]
                .into_iter()
                .filter_map(|(capability, absent)| absent.then_some(capability))
                .collect();
                Ok(Resolution::NotFound { missing })
            }
        }
    }
}
