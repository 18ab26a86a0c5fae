//! KodiVoice Error Types
//!
//! Every request either dispatches or fails with one of these.

use thiserror::Error;

/// Central error type for KodiVoice
#[derive(Error, Debug)]
pub enum ControlError {
    /// Missing or malformed request parameters, rejected before any device call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The snapshot was empty or nothing in it matched
    #[error("No results: {0}")]
    NoResults(String),

    /// Transport or RPC failure from the media device
    #[error("Device call failed: {0}")]
    DeviceCallFailed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ControlError {
    /// True for errors that originate from talking to the device
    pub fn is_device_failure(&self) -> bool {
        matches!(
            self,
            ControlError::DeviceCallFailed(_) | ControlError::Http(_) | ControlError::Json(_)
        )
    }
}

/// Result type alias for KodiVoice operations
pub type ControlResult<T> = Result<T, ControlError>;
