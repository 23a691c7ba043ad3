//! Error types for stream operations.

use std::io;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur during stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to position the read cursor beyond the end of the stream.
    #[error("seek beyond end of stream: offset {offset}, size {size}")]
    SeekPastEnd {
        /// The requested offset.
        offset: u64,
        /// The current stream size.
        size: u64,
    },

    /// The stream has been closed.
    #[error("stream is closed")]
    Closed,

    /// The stream was opened read-only.
    #[error("stream is read-only")]
    ReadOnly,
}
