use crate::Command;

use error_location::ErrorLocation;
use thiserror::Error;

/// Control core errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The page driver failed to read page state or perform an action.
    #[error("Page driver error: {reason} {location}")]
    Driver {
        /// Description of the driver failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A shortcut binding could not be accepted.
    #[error("Invalid binding for {command}: {reason} {location}")]
    InvalidBinding {
        /// Command whose binding was rejected.
        command: Command,
        /// Why the binding was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The control layout is internally inconsistent.
    #[error("Invalid control layout: {reason} {location}")]
    InvalidLayout {
        /// Description of the inconsistency.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
