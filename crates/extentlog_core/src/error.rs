//! Error types for extentlog core.
//!
//! Only conditions a caller must act on are errors: stream failures,
//! rejected arguments and rejected messages. Corruption found while reading
//! is never an error here; see [`crate::extent::ExtentError`].

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in extentlog core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying stream error.
    #[error("stream error: {0}")]
    Storage(#[from] extentlog_storage::StreamError),

    /// Compressing a body failed.
    #[error("compression failed: {message}")]
    Compression {
        /// Description of the failure.
        message: String,
    },

    /// An argument was rejected before anything was written.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// A message failed its own structural validation and was not written.
    #[error("invalid message: {message}")]
    InvalidMessage {
        /// Description of the validation failure.
        message: String,
    },

    /// A message could not be serialized.
    #[error("message serialization failed: {message}")]
    Message {
        /// Description of the failure.
        message: String,
    },

    /// The writer or reader has already been closed.
    #[error("log is closed")]
    Closed,
}

impl CoreError {
    /// Creates a compression error.
    pub fn compression(message: impl Into<String>) -> Self {
        Self::Compression {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid message error.
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }

    /// Creates a message serialization error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extentlog_storage::StreamError;

    #[test]
    fn storage_error_converts() {
        let err: CoreError = StreamError::Closed.into();
        assert!(matches!(err, CoreError::Storage(StreamError::Closed)));
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn helper_constructors() {
        let err = CoreError::invalid_message("missing field `id`");
        assert_eq!(err.to_string(), "invalid message: missing field `id`");

        let err = CoreError::invalid_argument("record too large");
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }
}
