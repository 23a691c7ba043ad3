//! In-memory byte stream for tests and in-process logs.

use crate::error::{StreamError, StreamResult};
use crate::stream::ByteStream;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Shared {
    data: RwLock<Vec<u8>>,
    flushes: AtomicU64,
}

/// An in-memory byte stream.
///
/// The bytes live in a buffer shared by every handle created with
/// [`MemoryStream::share`]; each handle keeps its own read cursor. This lets
/// a writer append through one handle while a reader observes the growing
/// log through another, which is how tail-resume scenarios are exercised.
///
/// # Thread Safety
///
/// Handles can be moved to other threads; the shared buffer is guarded by a
/// read-write lock.
///
/// # Example
///
/// ```rust
/// use extentlog_storage::{ByteStream, MemoryStream};
///
/// let mut writer = MemoryStream::new();
/// let mut reader = writer.share();
///
/// writer.write(b"test data").unwrap();
///
/// let mut buf = [0u8; 16];
/// assert_eq!(reader.read(&mut buf).unwrap(), 9);
/// assert_eq!(writer.len(), 9);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStream {
    shared: Arc<Shared>,
    cursor: u64,
    closed: bool,
}

impl MemoryStream {
    /// Creates a new empty in-memory stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory stream with pre-existing data.
    ///
    /// Useful for reading back corrupted or truncated logs.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            shared: Arc::new(Shared {
                data: RwLock::new(data),
                flushes: AtomicU64::new(0),
            }),
            cursor: 0,
            closed: false,
        }
    }

    /// Creates another handle onto the same bytes, with its read cursor at 0.
    #[must_use]
    pub fn share(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            cursor: 0,
            closed: false,
        }
    }

    /// Returns a copy of all bytes in the stream.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.shared.data.read().clone()
    }

    /// Returns the number of bytes in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.data.read().len()
    }

    /// Returns `true` if the stream holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns how many times any handle flushed the shared buffer.
    #[must_use]
    pub fn flush_count(&self) -> u64 {
        self.shared.flushes.load(Ordering::SeqCst)
    }

    /// Truncates the shared buffer to `len` bytes.
    ///
    /// Read cursors beyond the new end of any handle are clamped on their
    /// next read.
    pub fn truncate(&self, len: usize) {
        self.shared.data.write().truncate(len);
    }

    fn ensure_open(&self) -> StreamResult<()> {
        if self.closed {
            return Err(StreamError::Closed);
        }
        Ok(())
    }
}

impl ByteStream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        self.ensure_open()?;
        let data = self.shared.data.read();
        let start = (self.cursor as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.cursor = (start + n) as u64;
        Ok(n)
    }

    fn write(&mut self, new_data: &[u8]) -> StreamResult<()> {
        self.ensure_open()?;
        self.shared.data.write().extend_from_slice(new_data);
        Ok(())
    }

    fn tell(&self) -> StreamResult<u64> {
        self.ensure_open()?;
        Ok(self.cursor)
    }

    fn seek(&mut self, offset: u64) -> StreamResult<()> {
        self.ensure_open()?;
        let size = self.len() as u64;
        if offset > size {
            return Err(StreamError::SeekPastEnd { offset, size });
        }
        self.cursor = offset;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.ensure_open()?;
        // Nothing is buffered, but flushes are counted so callers can
        // observe that a flush reached the stream.
        self.shared.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        self.closed = true;
        Ok(())
    }
}
