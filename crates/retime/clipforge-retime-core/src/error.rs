//! Error types for clip re-timing operations

use serde::{Deserialize, Serialize};

/// Error type covering the bake/trim/persist surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ClipError {
    /// Missing or unusable input to a transform
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Trim bounds outside 0 <= start < end <= length
    #[error("Invalid trim range [{start}, {end}] for clip of length {length}")]
    InvalidRange { start: f32, end: f32, length: f32 },

    /// Clip data failed structural validation
    #[error("Malformed clip: {reason}")]
    MalformedClip { reason: String },

    /// The persistence collaborator refused the clip
    #[error("Save failed for '{name}': {reason}")]
    SaveFailed { name: String, reason: String },
}

impl ClipError {
    /// Shorthand for an `InvalidInput` with a reason string.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::InvalidRange { .. } => "validation",
            Self::MalformedClip { .. } => "data",
            Self::SaveFailed { .. } => "persistence",
        }
    }
}

impl From<serde_json::Error> for ClipError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedClip {
            reason: err.to_string(),
        }
    }
}
