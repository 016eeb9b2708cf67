use std::path::PathBuf;

use crate::foundation::core::Canvas;

/// Result alias used across the crate.
pub type FlagwaveResult<T> = Result<T, FlagwaveError>;

/// Errors produced while configuring, synthesizing or encoding a clip.
#[derive(thiserror::Error, Debug)]
pub enum FlagwaveError {
    /// The configured input image does not exist.
    #[error("input not found: '{}'", .0.display())]
    InputNotFound(PathBuf),

    /// The output video stream could not be opened.
    #[error("stream open error: {0}")]
    StreamOpen(String),

    /// A frame or base image disagrees with the configured canvas.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimensions.
        expected: Canvas,
        /// Dimensions actually observed.
        actual: Canvas,
    },

    /// Invalid configuration or argument.
    #[error("validation error: {0}")]
    Validation(String),

    /// The input image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Writing or finalizing the output stream failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Catch-all for contextual I/O failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlagwaveError {
    /// Build a [`FlagwaveError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlagwaveError::StreamOpen`].
    pub fn stream_open(msg: impl Into<String>) -> Self {
        Self::StreamOpen(msg.into())
    }

    /// Build a [`FlagwaveError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FlagwaveError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Process exit code for this error.
    ///
    /// `0` is reserved for success.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InputNotFound(_) => 2,
            Self::StreamOpen(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
