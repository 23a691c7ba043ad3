//! Byte stream trait definition.

use crate::error::StreamResult;

/// A sequential byte stream underneath an extent log.
///
/// Streams are **opaque byte sequences**. The writer appends framed extents
/// and flushes; the reader pulls bytes in chunks from a cursor. Streams do
/// not understand extents, checksums or records.
///
/// # Invariants
///
/// - `write` appends at the end of the stream, independent of the read cursor
/// - `read` returns bytes in the order they were written
/// - `read` returning `Ok(0)` means no bytes are available *now*; a later
///   call may return bytes appended since
/// - `flush` makes every byte written so far visible and durable to the
///   extent the stream supports
/// - After `close`, every operation returns [`crate::StreamError::Closed`]
///
/// # Implementors
///
/// - [`super::MemoryStream`] - For tests and in-process logs
/// - [`super::FileStream`] - For persistent logs
pub trait ByteStream: Send {
    /// Reads up to `buf.len()` bytes at the read cursor and advances it.
    ///
    /// Returns the number of bytes read, which may be less than requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is closed or an I/O error occurs.
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize>;

    /// Appends `data` to the end of the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is closed, read-only, or an I/O
    /// error occurs. A failed write may have appended a prefix of `data`.
    fn write(&mut self, data: &[u8]) -> StreamResult<()>;

    /// Returns the current position: the read cursor for readable streams,
    /// the end offset for write-only streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is closed.
    fn tell(&self) -> StreamResult<u64>;

    /// Moves the read cursor to `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` lies beyond the end of the stream, the
    /// stream is closed, or an I/O error occurs.
    fn seek(&mut self, offset: u64) -> StreamResult<()>;

    /// Flushes all pending writes.
    ///
    /// After this returns successfully, all previously written bytes are
    /// visible to readers of the same underlying storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StreamResult<()>;

    /// Closes the stream, releasing the underlying handle.
    ///
    /// Closing an already closed stream is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if final flushing or syncing fails.
    fn close(&mut self) -> StreamResult<()>;
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        (**self).write(data)
    }

    fn tell(&self) -> StreamResult<u64> {
        (**self).tell()
    }

    fn seek(&mut self, offset: u64) -> StreamResult<()> {
        (**self).seek(offset)
    }

    fn flush(&mut self) -> StreamResult<()> {
        (**self).flush()
    }

    fn close(&mut self) -> StreamResult<()> {
        (**self).close()
    }
}

impl<S: ByteStream + ?Sized> ByteStream for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        (**self).write(data)
    }

    fn tell(&self) -> StreamResult<u64> {
        (**self).tell()
    }

    fn seek(&mut self, offset: u64) -> StreamResult<()> {
        (**self).seek(offset)
    }

    fn flush(&mut self) -> StreamResult<()> {
        (**self).flush()
    }

    fn close(&mut self) -> StreamResult<()> {
        (**self).close()
    }
}
