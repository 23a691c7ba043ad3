//! Extent log writer.

use crate::compression::Compression;
use crate::config::WriterOptions;
use crate::error::{CoreError, CoreResult};
use crate::extent::{self, EncodedExtent};
use crate::message::Message;
use crate::record::{append_record, framed_len};
use crate::stats::WriterStats;
use extentlog_storage::ByteStream;
use tracing::{debug, trace, warn};

/// Batches records into extents and appends them to a stream.
///
/// Records accumulate in a pending buffer until it reaches the flush
/// threshold, then the buffer is framed as one extent and written. A record
/// whose framed size alone reaches the threshold is written as its own
/// extent right away.
///
/// # Durability
///
/// [`LogWriter::flush`] always flushes the stream, even when nothing is
/// pending. Dropping a writer that was not closed flushes pending records;
/// errors at that point can only be logged.
///
/// # Example
///
/// ```rust
/// use extentlog_core::{LogWriter, WriterOptions};
/// use extentlog_storage::MemoryStream;
///
/// let mut stream = MemoryStream::new();
/// let mut writer = LogWriter::new(&mut stream, WriterOptions::default()).unwrap();
/// writer.write_record(b"hello").unwrap();
/// writer.flush().unwrap();
/// assert_eq!(writer.stats().extents, 1);
/// ```
pub struct LogWriter<S: ByteStream> {
    stream: S,
    options: WriterOptions,
    /// Framed records not yet written.
    pending: Vec<u8>,
    pending_records: usize,
    /// Reused buffer for the encoded extent.
    encoded: Vec<u8>,
    stats: WriterStats,
    closed: bool,
}

impl<S: ByteStream> LogWriter<S> {
    /// Creates a writer appending to `stream`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the options do not validate.
    pub fn new(stream: S, options: WriterOptions) -> CoreResult<Self> {
        options.validate()?;
        Ok(Self {
            stream,
            options,
            pending: Vec::new(),
            pending_records: 0,
            encoded: Vec::new(),
            stats: WriterStats::default(),
            closed: false,
        })
    }

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is larger than `u32::MAX` bytes (nothing
    /// is written), if the writer is closed, or if emitting an extent fails.
    pub fn write_record(&mut self, record: &[u8]) -> CoreResult<()> {
        self.ensure_open()?;
        let framed = framed_len(record.len());
        if framed > extent::MAX_BODY_SIZE {
            return Err(CoreError::invalid_argument(format!(
                "record of {} bytes exceeds maximum of {}",
                record.len(),
                extent::MAX_BODY_SIZE - framed_len(0)
            )));
        }

        if framed >= self.options.flush_threshold {
            // Oversized records go out alone so the pending buffer stays bounded.
            self.emit_pending()?;
            append_record(&mut self.pending, record)?;
            self.pending_records = 1;
            self.stats.records += 1;
            trace!(len = record.len(), "record emitted as its own extent");
            return self.emit_pending();
        }

        append_record(&mut self.pending, record)?;
        self.pending_records += 1;
        self.stats.records += 1;
        trace!(len = record.len(), pending = self.pending.len(), "record buffered");

        if self.pending.len() >= self.options.flush_threshold {
            self.emit_pending()?;
        }
        Ok(())
    }

    /// Serializes and appends a message.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMessage` without writing anything if the message fails
    /// [`Message::is_valid`], or any error from serialization or
    /// [`LogWriter::write_record`].
    pub fn write_message<M: Message>(&mut self, message: &M) -> CoreResult<()> {
        self.ensure_open()?;
        if !message.is_valid() {
            return Err(CoreError::invalid_message(format!(
                "{} failed validation",
                std::any::type_name::<M>()
            )));
        }
        let bytes = message.encode()?;
        self.write_record(&bytes)
    }

    /// Writes pending records as an extent, then flushes the stream.
    ///
    /// The stream is flushed even when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer is closed or the stream fails.
    pub fn flush(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.emit_pending()?;
        self.stream.flush()?;
        self.stats.flushes += 1;
        debug!(extents = self.stats.extents, "log writer flushed");
        Ok(())
    }

    /// Flushes, then closes the stream if the writer owns it.
    ///
    /// Later calls on the writer return [`CoreError::Closed`]. Closing twice
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush or the stream close fails.
    pub fn close(&mut self) -> CoreResult<()> {
        if self.closed {
            return Ok(());
        }
        let flushed = self.flush();
        self.closed = true;
        if self.options.own_stream {
            self.stream.close()?;
        }
        flushed
    }

    /// Returns a snapshot of the writer counters.
    #[must_use]
    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Returns the framed size of records buffered but not yet written.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of records buffered but not yet written.
    #[must_use]
    pub fn pending_records(&self) -> usize {
        self.pending_records
    }

    /// Returns the number of bytes this writer appended to the stream.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.stats.stored_bytes
    }

    /// Returns the options the writer was created with.
    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Returns a reference to the underlying stream.
    #[must_use]
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.closed {
            return Err(CoreError::Closed);
        }
        Ok(())
    }

    /// Frames the pending buffer as one extent and writes it.
    ///
    /// The pending buffer is cleared before the stream write, so a failed
    /// write loses those records and reports the error.
    fn emit_pending(&mut self) -> CoreResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.encoded.clear();
        let EncodedExtent {
            compressed,
            stored_len,
            extent_len,
        } = extent::encode(
            &self.pending,
            self.options.compression,
            self.options.compression_level,
            &mut self.encoded,
        )?;

        let logical = self.pending.len();
        let records = self.pending_records;
        self.pending.clear();
        self.pending_records = 0;

        self.stream.write(&self.encoded)?;

        let fallback = self.options.compression != Compression::None && !compressed;
        self.stats.record_extent(logical, extent_len, compressed, fallback);
        debug!(
            records,
            logical,
            stored = stored_len,
            compressed,
            codec = %self.options.compression,
            "extent written"
        );
        Ok(())
    }
}

impl<S: ByteStream> Drop for LogWriter<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            warn!(error = %e, pending = self.pending.len(), "failed to flush log writer on drop");
        }
        self.closed = true;
        if self.options.own_stream {
            if let Err(e) = self.stream.close() {
                warn!(error = %e, "failed to close stream on drop");
            }
        }
    }
}
