//! Writer and reader configuration.

use crate::compression::{Compression, DEFAULT_ZSTD_LEVEL};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Default pending-buffer size at which the writer emits an extent.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 64 * 1024; // 64 KB

/// Default number of bytes the reader requests per stream read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Configuration for a [`LogWriter`](crate::LogWriter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Codec applied to extent bodies.
    pub compression: Compression,

    /// Compression level (zstd only).
    pub compression_level: i32,

    /// Pending bytes at which an extent is emitted.
    ///
    /// A record whose framed size alone reaches this is emitted as its own
    /// extent.
    pub flush_threshold: usize,

    /// Whether the writer closes the stream when it is closed or dropped.
    pub own_stream: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            compression_level: DEFAULT_ZSTD_LEVEL,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            own_stream: false,
        }
    }
}

impl WriterOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body codec.
    #[must_use]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the zstd compression level.
    #[must_use]
    pub const fn compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the flush threshold in bytes.
    #[must_use]
    pub const fn flush_threshold(mut self, bytes: usize) -> Self {
        self.flush_threshold = bytes;
        self
    }

    /// Sets whether the writer owns the stream.
    #[must_use]
    pub const fn own_stream(mut self, value: bool) -> Self {
        self.own_stream = value;
        self
    }

    /// Checks that the options are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero flush threshold.
    pub fn validate(&self) -> CoreResult<()> {
        if self.flush_threshold == 0 {
            return Err(CoreError::invalid_argument(
                "flush_threshold must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Configuration for a [`LogReader`](crate::LogReader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Whether the reader closes the stream when it is closed or dropped.
    pub own_stream: bool,

    /// Byte range `[start, end)` to scan. Extents starting in the range are
    /// read in full even when they end past `end`.
    pub range: Option<(u64, u64)>,

    /// Hold an undecodable tail as unconsumed bytes instead of skipping it,
    /// so that a later read can complete it once a writer appends the rest.
    pub resume_incomplete_tail: bool,

    /// Bytes requested from the stream per read.
    pub read_chunk_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            own_stream: false,
            range: None,
            resume_incomplete_tail: false,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl ReaderOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the reader owns the stream.
    #[must_use]
    pub const fn own_stream(mut self, value: bool) -> Self {
        self.own_stream = value;
        self
    }

    /// Restricts scanning to extents starting in `[start, end)`.
    #[must_use]
    pub const fn range(mut self, start: u64, end: u64) -> Self {
        self.range = Some((start, end));
        self
    }

    /// Sets the tail policy.
    #[must_use]
    pub const fn resume_incomplete_tail(mut self, value: bool) -> Self {
        self.resume_incomplete_tail = value;
        self
    }

    /// Sets the stream read size.
    #[must_use]
    pub const fn read_chunk_size(mut self, bytes: usize) -> Self {
        self.read_chunk_size = bytes;
        self
    }

    /// Checks that the options are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero chunk size or an empty or
    /// inverted range.
    pub fn validate(&self) -> CoreResult<()> {
        if self.read_chunk_size == 0 {
            return Err(CoreError::invalid_argument(
                "read_chunk_size must be greater than zero",
            ));
        }
        if let Some((start, end)) = self.range {
            if start >= end {
                return Err(CoreError::invalid_argument(format!(
                    "range [{start}, {end}) is empty"
                )));
            }
        }
        Ok(())
    }
}
