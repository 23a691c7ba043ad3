//! Corruption-tolerant extent log reader.
//!
//! ## Recovery Policy
//!
//! Nothing found in the stream is fatal; only stream I/O errors are
//! returned as `Err`.
//!
//! - **Corrupt extent** (magic, header checksum, body checksum, unknown
//!   codec, undecompressable body): skip at least one byte, scan forward to
//!   the next magic candidate and retry. Every skipped byte is added to
//!   `skipped_bytes`.
//! - **Truncated extent with more bytes to come**: refill and retry.
//! - **Truncated extent at the end of the stream** (the tail): by default the
//!   tail is resynchronized through like corruption, so every byte of it that
//!   does not decode is counted as skipped. With
//!   [`ReaderOptions::resume_incomplete_tail`] the bytes are kept as
//!   unconsumed, nothing is counted, and a later read completes the extent
//!   once the rest has been appended. A short extent followed by a complete
//!   one is damage rather than a tail and is skipped under both policies.
//!
//! Reaching the end of the stream is not terminal: the next call polls the
//! stream again.
//!
//! ## Sharded Scanning
//!
//! With [`ReaderOptions::range`] set to `[start, end)`, the reader returns
//! the records of every extent whose first byte lies in the range, reading
//! past `end` to finish the last one. When `start > 0` the reader first
//! aligns to the first valid extent at or after `start`; bytes passed over
//! while aligning are not counted as skipped. A damaged extent is counted by
//! the range holding its first byte, which skips past `end` to the next
//! magic.

use crate::config::ReaderOptions;
use crate::error::{CoreError, CoreResult};
use crate::extent::{self, ExtentError, EXTENT_MAGIC};
use crate::message::Message;
use crate::record::split_records;
use crate::stats::ReaderStats;
use extentlog_storage::ByteStream;
use std::marker::PhantomData;
use std::ops::Range;
use tracing::{debug, info, trace, warn};

/// Reads records back from an extent log.
///
/// # Example
///
/// ```rust
/// use extentlog_core::{LogReader, LogWriter, ReaderOptions, WriterOptions};
/// use extentlog_storage::MemoryStream;
///
/// let mut stream = MemoryStream::new();
/// let mut writer = LogWriter::new(&mut stream, WriterOptions::default()).unwrap();
/// writer.write_record(b"first").unwrap();
/// writer.write_record(b"second").unwrap();
/// writer.close().unwrap();
/// drop(writer);
///
/// let mut reader = LogReader::new(stream.share(), ReaderOptions::default()).unwrap();
/// assert_eq!(reader.read_record().unwrap(), Some(&b"first"[..]));
/// assert_eq!(reader.read_record().unwrap(), Some(&b"second"[..]));
/// assert_eq!(reader.read_record().unwrap(), None);
/// assert_eq!(reader.accumulated_skipped_bytes(), 0);
/// ```
pub struct LogReader<S: ByteStream> {
    stream: S,
    options: ReaderOptions,
    /// Refill buffer; `buf[pos..]` has not been decoded yet.
    buf: Vec<u8>,
    pos: usize,
    /// Absolute stream offset of `buf[pos]`.
    offset: u64,
    /// Logical body of the current extent.
    body: Vec<u8>,
    records: Vec<Range<usize>>,
    next: usize,
    /// False until the first valid extent of a range starting past 0.
    aligned: bool,
    /// Offset of the tail held for resume, to log it once.
    held_tail: Option<u64>,
    stats: ReaderStats,
    closed: bool,
}

impl<S: ByteStream> LogReader<S> {
    /// Creates a reader over `stream`.
    ///
    /// With a range configured the stream is positioned at the range start;
    /// otherwise reading starts at the stream's current position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the options do not validate, or a stream
    /// error if positioning fails.
    pub fn new(mut stream: S, options: ReaderOptions) -> CoreResult<Self> {
        options.validate()?;
        let (offset, aligned) = match options.range {
            Some((start, _)) => {
                stream.seek(start)?;
                (start, start == 0)
            }
            None => (stream.tell()?, true),
        };
        Ok(Self {
            stream,
            options,
            buf: Vec::new(),
            pos: 0,
            offset,
            body: Vec::new(),
            records: Vec::new(),
            next: 0,
            aligned,
            held_tail: None,
            stats: ReaderStats::default(),
            closed: false,
        })
    }

    /// Returns the next record.
    ///
    /// The slice borrows the reader's buffer and lives until the next call
    /// that takes `&mut self`. Returns `Ok(None)` when no complete extent is
    /// currently available; calling again later picks up bytes appended
    /// since.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is closed or the stream fails.
    pub fn read_record(&mut self) -> CoreResult<Option<&[u8]>> {
        match self.next_record()? {
            Some(range) => {
                self.stats.records += 1;
                Ok(Some(&self.body[range]))
            }
            None => Ok(None),
        }
    }

    /// Returns the next record as an owned buffer.
    ///
    /// # Errors
    ///
    /// Same as [`LogReader::read_record`].
    pub fn read_record_owned(&mut self) -> CoreResult<Option<Vec<u8>>> {
        Ok(self.read_record()?.map(<[u8]>::to_vec))
    }

    /// Returns the next record that parses as `M` and passes
    /// [`Message::is_valid`].
    ///
    /// Records that do not are skipped and counted in
    /// [`LogReader::accumulated_skipped_records`]; this is not stream
    /// corruption, since a log may mix message and raw records.
    ///
    /// # Errors
    ///
    /// Same as [`LogReader::read_record`].
    pub fn read_message<M: Message>(&mut self) -> CoreResult<Option<M>> {
        while let Some(range) = self.next_record()? {
            match M::decode(&self.body[range]) {
                Ok(message) if message.is_valid() => {
                    self.stats.records += 1;
                    return Ok(Some(message));
                }
                Ok(_) => {
                    self.stats.skipped_records += 1;
                    debug!(offset = self.offset, "skipping record that failed validation");
                }
                Err(e) => {
                    self.stats.skipped_records += 1;
                    debug!(
                        offset = self.offset,
                        error = %e,
                        "skipping record that is not a message"
                    );
                }
            }
        }
        Ok(None)
    }

    /// Iterates over the remaining records as owned buffers.
    pub fn records(&mut self) -> Records<'_, S> {
        Records {
            reader: self,
            failed: false,
        }
    }

    /// Iterates over the remaining records that parse as `M`.
    pub fn messages<M: Message>(&mut self) -> Messages<'_, S, M> {
        Messages {
            reader: self,
            failed: false,
            _message: PhantomData,
        }
    }

    /// Bytes skipped as undecodable so far.
    #[must_use]
    pub fn accumulated_skipped_bytes(&self) -> u64 {
        self.stats.skipped_bytes
    }

    /// Records skipped by [`LogReader::read_message`] so far.
    #[must_use]
    pub fn accumulated_skipped_records(&self) -> u64 {
        self.stats.skipped_records
    }

    /// Bytes read from the stream but not yet decoded.
    ///
    /// After a read returns `None` in resume mode this is the size of the
    /// held tail.
    #[must_use]
    pub fn unconsumed_bytes(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Absolute stream offset of the next undecoded byte.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Returns a snapshot of the reader counters.
    #[must_use]
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Returns the options the reader was created with.
    #[must_use]
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Closes the stream if the reader owns it.
    ///
    /// Later reads return [`CoreError::Closed`]. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the stream fails.
    pub fn close(&mut self) -> CoreResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.options.own_stream {
            self.stream.close()?;
        }
        Ok(())
    }

    /// Pops the next record of the current extent, decoding extents as
    /// needed, and returns its range in `self.body`.
    fn next_record(&mut self) -> CoreResult<Option<Range<usize>>> {
        if self.closed {
            return Err(CoreError::Closed);
        }
        loop {
            if let Some(range) = self.records.get(self.next).cloned() {
                self.next += 1;
                trace!(len = range.len(), "record decoded");
                return Ok(Some(range));
            }
            if !self.load_extent()? {
                return Ok(None);
            }
        }
    }

    /// Decodes the next extent into `self.body`.
    ///
    /// Returns `false` when no extent can be decoded from the bytes
    /// available now.
    fn load_extent(&mut self) -> CoreResult<bool> {
        self.records.clear();
        self.next = 0;

        loop {
            if self.past_range_end() {
                return Ok(false);
            }

            match extent::decode(&self.buf[self.pos..], &mut self.body) {
                Ok(consumed) => {
                    let start = self.offset;
                    self.advance(consumed);
                    self.held_tail = None;
                    if !self.aligned {
                        debug!(offset = start, "aligned to first extent in range");
                        self.aligned = true;
                    }

                    match split_records(&self.body) {
                        Some(ranges) => {
                            self.stats.extents += 1;
                            debug!(
                                offset = start,
                                len = consumed,
                                records = ranges.len(),
                                "extent read"
                            );
                            self.records = ranges;
                            return Ok(true);
                        }
                        None => {
                            self.stats.skipped_bytes += consumed as u64;
                            warn!(
                                offset = start,
                                len = consumed,
                                "dropping extent with malformed record framing"
                            );
                        }
                    }
                }
                Err(ExtentError::Truncated { needed }) => {
                    if self.fill(needed)? {
                        continue;
                    }
                    let remaining = self.unconsumed_bytes();
                    if remaining == 0 {
                        return Ok(false);
                    }
                    let err = ExtentError::Truncated { needed };
                    if self.options.resume_incomplete_tail {
                        // A complete extent further on means the short extent
                        // here is damage, not a write still in progress.
                        if let Some(next) = self.next_complete_extent() {
                            let target = if self.aligned {
                                next
                            } else {
                                next.min(self.range_limit())
                            };
                            self.skip(target - self.pos, &err);
                            continue;
                        }
                        if self.held_tail != Some(self.offset) {
                            info!(
                                offset = self.offset,
                                bytes = remaining,
                                "holding incomplete tail for resume"
                            );
                            self.held_tail = Some(self.offset);
                        }
                        return Ok(false);
                    }
                    if self.aligned {
                        warn!(offset = self.offset, bytes = remaining, "undecodable tail");
                    }
                    self.resync(&err)?;
                }
                Err(err) => self.resync(&err)?,
            }
        }
    }

    /// Skips to the next magic candidate, at least one byte ahead.
    ///
    /// While aligning, the skip stops at the range end. Once aligned, the
    /// reader owns the damaged extent and skips past the range end up to a
    /// confirmed magic, so the bytes are counted by exactly one shard.
    fn resync(&mut self, err: &ExtentError) -> CoreResult<()> {
        let at = self.offset;
        let mut from = self.pos + 1;
        let result = loop {
            let found = extent::find_magic(&self.buf, from.min(self.buf.len()));
            let next = if self.aligned {
                found
            } else {
                found.min(self.range_limit())
            }
            .max(from);

            let confirmed = next + EXTENT_MAGIC.len() <= self.buf.len();
            let beyond_end = matches!(
                self.options.range,
                Some((_, end)) if self.offset + (next - self.pos) as u64 >= end
            );
            self.advance(next - self.pos);
            if confirmed || !self.aligned || !beyond_end {
                break Ok(());
            }
            // Past the range end nothing else decodes here, so settle the
            // candidate now.
            match self.fill(EXTENT_MAGIC.len()) {
                Ok(true) => from = self.pos,
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.record_skip(at, (self.offset - at) as usize, err);
        result
    }

    /// Finds the next buffered position after the cursor where a complete
    /// extent decodes.
    fn next_complete_extent(&mut self) -> Option<usize> {
        let mut candidate = extent::find_magic(&self.buf, self.pos + 1);
        while candidate < self.buf.len() {
            if extent::decode(&self.buf[candidate..], &mut self.body).is_ok() {
                return Some(candidate);
            }
            candidate = extent::find_magic(&self.buf, candidate + 1);
        }
        None
    }

    /// Advances past `n` undecodable bytes, counting them once aligned.
    fn skip(&mut self, n: usize, err: &ExtentError) {
        let at = self.offset;
        self.advance(n);
        self.record_skip(at, n, err);
    }

    fn record_skip(&mut self, at: u64, n: usize, err: &ExtentError) {
        if n == 0 {
            return;
        }
        if self.aligned {
            self.stats.skipped_bytes += n as u64;
            self.stats.resyncs += 1;
            warn!(
                offset = at,
                error = %err,
                kind = err.kind(),
                skipped = n,
                "resynchronized after corrupt extent"
            );
        } else {
            trace!(offset = at, skipped = n, "aligning to range");
        }
    }

    /// Reads until at least `needed` undecoded bytes are buffered.
    ///
    /// Returns `false` if the stream ran out first.
    fn fill(&mut self, needed: usize) -> CoreResult<bool> {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        while self.buf.len() < needed {
            let filled = self.buf.len();
            self.buf.resize(filled + self.options.read_chunk_size, 0);
            let read = self.stream.read(&mut self.buf[filled..]);
            let n = match read {
                Ok(n) => n,
                Err(e) => {
                    self.buf.truncate(filled);
                    return Err(e.into());
                }
            };
            self.buf.truncate(filled + n);
            if n == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
        self.offset += n as u64;
    }

    fn past_range_end(&self) -> bool {
        matches!(self.options.range, Some((_, end)) if self.offset >= end)
    }

    /// Index in `buf` of the range end, or the buffer end.
    fn range_limit(&self) -> usize {
        match self.options.range {
            Some((_, end)) => {
                let left = end.saturating_sub(self.offset);
                let available = (self.buf.len() - self.pos) as u64;
                // Safe: bounded by the buffered length
                self.pos + left.min(available) as usize
            }
            None => self.buf.len(),
        }
    }
}

impl<S: ByteStream> Drop for LogReader<S> {
    fn drop(&mut self) {
        if !self.closed && self.options.own_stream {
            if let Err(e) = self.stream.close() {
                warn!(error = %e, "failed to close stream on drop");
            }
        }
    }
}

/// Iterator over owned records, created by [`LogReader::records`].
///
/// Ends at the first `None` or after yielding an error.
pub struct Records<'a, S: ByteStream> {
    reader: &'a mut LogReader<S>,
    failed: bool,
}

impl<S: ByteStream> Iterator for Records<'_, S> {
    type Item = CoreResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_record_owned() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over messages, created by [`LogReader::messages`].
///
/// Ends at the first `None` or after yielding an error.
pub struct Messages<'a, S: ByteStream, M> {
    reader: &'a mut LogReader<S>,
    failed: bool,
    _message: PhantomData<fn() -> M>,
}

impl<S: ByteStream, M: Message> Iterator for Messages<'_, S, M> {
    type Item = CoreResult<M>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_message::<M>() {
            Ok(message) => message.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::Compression;
    use crate::config::WriterOptions;
    use crate::writer::LogWriter;
    use extentlog_storage::{MemoryStream, StreamError};

    fn write_log(records: &[&[u8]], options: WriterOptions) -> Vec<u8> {
        let mut stream = MemoryStream::new();
        let mut writer = LogWriter::new(&mut stream, options).unwrap();
        for record in records {
            writer.write_record(record).unwrap();
        }
        writer.close().unwrap();
        drop(writer);
        stream.data()
    }

    /// One extent per record.
    fn write_extents(records: &[&[u8]]) -> Vec<u8> {
        write_log(records, WriterOptions::new().flush_threshold(1))
    }

    fn read_all(data: Vec<u8>, options: ReaderOptions) -> (Vec<Vec<u8>>, ReaderStats) {
        let mut reader = LogReader::new(MemoryStream::with_data(data), options).unwrap();
        let records = reader.records().collect::<CoreResult<Vec<_>>>().unwrap();
        (records, reader.stats())
    }

    #[test]
    fn roundtrip() {
        let records: [&[u8]; 4] = [b"", b"a", b"ab", b"abc"];
        let (read, stats) = read_all(
            write_log(&records, WriterOptions::default()),
            ReaderOptions::default(),
        );
        assert_eq!(read, records);
        assert_eq!(stats.records, 4);
        assert_eq!(stats.extents, 1);
        assert!(stats.is_clean());
    }

    #[test]
    fn small_chunks_roundtrip() {
        let records: Vec<Vec<u8>> = (0..50u8).map(|i| vec![i; i as usize * 7]).collect();
        let refs: Vec<&[u8]> = records.iter().map(Vec::as_slice).collect();
        let data = write_log(&refs, WriterOptions::new().flush_threshold(100));
        let (read, stats) = read_all(data, ReaderOptions::new().read_chunk_size(3));
        assert_eq!(read, records);
        assert!(stats.is_clean());
    }

    #[test]
    fn empty_stream_reads_nothing() {
        let (read, stats) = read_all(Vec::new(), ReaderOptions::default());
        assert!(read.is_empty());
        assert_eq!(stats, ReaderStats::default());
    }

    #[test]
    fn garbage_between_extents_is_skipped() {
        let first = write_extents(&[b"first"]);
        let second = write_extents(&[b"second"]);
        let mut data = first;
        data.extend_from_slice(b"0123456789");
        data.extend_from_slice(&second);

        let (read, stats) = read_all(data, ReaderOptions::default());
        assert_eq!(read, vec![b"first".to_vec(), b"second".to_vec()]);
        assert_eq!(stats.skipped_bytes, 10);
        assert!(stats.resyncs >= 1);
    }

    #[test]
    fn corrupt_body_loses_only_its_extent() {
        let data = write_extents(&[b"alpha", b"bravo", b"charlie"]);
        let extent_len = extent::SHORT_HEADER_SIZE + 9 + extent::TRAILER_SIZE;
        let mut corrupted = data.clone();
        corrupted[extent_len + extent::SHORT_HEADER_SIZE + 5] ^= 0x04;

        let (read, stats) = read_all(corrupted, ReaderOptions::default());
        assert_eq!(read, vec![b"alpha".to_vec(), b"charlie".to_vec()]);
        assert_eq!(stats.skipped_bytes, extent_len as u64);
    }

    #[test]
    fn truncated_tail_default_policy() {
        let data = write_extents(&[b"kept", b"lost record"]);
        let cut = data.len() - 3;
        let tail = cut - (extent::SHORT_HEADER_SIZE + 8 + extent::TRAILER_SIZE);

        let (read, stats) = read_all(data[..cut].to_vec(), ReaderOptions::default());
        assert_eq!(read, vec![b"kept".to_vec()]);
        assert_eq!(stats.skipped_bytes, tail as u64);
    }

    #[test]
    fn truncated_tail_resume_policy() {
        let data = write_extents(&[b"kept", b"completed later"]);
        let cut = data.len() - 5;
        let first_len = extent::SHORT_HEADER_SIZE + 8 + extent::TRAILER_SIZE;

        let stream = MemoryStream::with_data(data[..cut].to_vec());
        let mut appender = stream.share();
        let options = ReaderOptions::new().resume_incomplete_tail(true);
        let mut reader = LogReader::new(stream, options).unwrap();

        assert_eq!(reader.read_record_owned().unwrap(), Some(b"kept".to_vec()));
        assert_eq!(reader.read_record().unwrap(), None);
        assert_eq!(reader.accumulated_skipped_bytes(), 0);
        assert_eq!(reader.unconsumed_bytes(), cut - first_len);
        assert_eq!(reader.position(), first_len as u64);

        // Still incomplete on a second poll.
        assert_eq!(reader.read_record().unwrap(), None);

        appender.write(&data[cut..]).unwrap();
        assert_eq!(
            reader.read_record_owned().unwrap(),
            Some(b"completed later".to_vec())
        );
        assert_eq!(reader.read_record().unwrap(), None);
        assert_eq!(reader.accumulated_skipped_bytes(), 0);
        assert_eq!(reader.unconsumed_bytes(), 0);
    }

    #[test]
    fn end_of_data_is_not_terminal() {
        let stream = MemoryStream::new();
        let mut appender = stream.share();
        let mut reader = LogReader::new(stream, ReaderOptions::default()).unwrap();
        assert_eq!(reader.read_record().unwrap(), None);

        appender.write(&write_extents(&[b"late"])).unwrap();
        assert_eq!(reader.read_record_owned().unwrap(), Some(b"late".to_vec()));
    }

    #[test]
    fn duplicated_extent_reappears() {
        let single = write_extents(&[b"twice"]);
        let mut data = single.clone();
        data.extend_from_slice(&single);
        let (read, stats) = read_all(data, ReaderOptions::default());
        assert_eq!(read, vec![b"twice".to_vec(), b"twice".to_vec()]);
        assert!(stats.is_clean());
    }

    #[test]
    fn compressed_extents_roundtrip() {
        let big = b"abc".repeat(1000);
        let records: [&[u8]; 3] = [b"", b"a", &big];
        for codec in [Compression::Zstd, Compression::Lz4] {
            let data = write_log(&records, WriterOptions::new().compression(codec));
            let (read, stats) = read_all(data, ReaderOptions::default());
            assert_eq!(read, records);
            assert!(stats.is_clean());
        }
    }

    #[test]
    fn range_scan_partitions_records() {
        let records: Vec<Vec<u8>> = (0..20u32)
            .map(|i| format!("record-{i}").into_bytes())
            .collect();
        let refs: Vec<&[u8]> = records.iter().map(Vec::as_slice).collect();
        let data = write_extents(&refs);
        let len = data.len() as u64;

        let mut combined = Vec::new();
        for (start, end) in [(0, 37), (37, 101), (101, 102), (102, len)] {
            let options = ReaderOptions::new().range(start, end);
            let (read, stats) = read_all(data.clone(), options);
            assert_eq!(stats.skipped_bytes, 0);
            combined.extend(read);
        }
        assert_eq!(combined, records);
    }

    #[test]
    fn range_ending_mid_extent_finishes_it() {
        let data = write_extents(&[b"one", b"two"]);
        let (read, _) = read_all(data, ReaderOptions::new().range(0, 1));
        assert_eq!(read, vec![b"one".to_vec()]);
    }

    #[test]
    fn closed_reader_rejects_reads() {
        let mut stream = MemoryStream::with_data(write_extents(&[b"x"]));
        {
            let options = ReaderOptions::new().own_stream(true);
            let mut reader = LogReader::new(&mut stream, options).unwrap();
            reader.close().unwrap();
            assert!(matches!(reader.read_record(), Err(CoreError::Closed)));
        }
        assert!(matches!(stream.tell(), Err(StreamError::Closed)));
    }

    #[test]
    fn borrowed_stream_stays_open() {
        let mut stream = MemoryStream::with_data(write_extents(&[b"x"]));
        {
            let mut reader = LogReader::new(&mut stream, ReaderOptions::default()).unwrap();
            assert!(reader.read_record().unwrap().is_some());
        }
        assert!(stream.tell().is_ok());
    }

    #[test]
    fn stream_errors_propagate() {
        let mut stream = MemoryStream::with_data(write_extents(&[b"x"]));
        stream.close().unwrap();
        assert!(LogReader::new(stream, ReaderOptions::default()).is_err());
    }

    #[test]
    fn file_stream_roundtrip() {
        use extentlog_storage::FileStream;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.log");

        let options = WriterOptions::new()
            .compression(Compression::Lz4)
            .flush_threshold(64)
            .own_stream(true);
        let mut writer = LogWriter::new(FileStream::create(&path).unwrap(), options).unwrap();
        for i in 0..100u32 {
            writer.write_record(&i.to_le_bytes().repeat(i as usize % 9)).unwrap();
        }
        writer.close().unwrap();

        let options = ReaderOptions::new().own_stream(true);
        let mut reader = LogReader::new(FileStream::open_read(&path).unwrap(), options).unwrap();
        let records = reader.records().collect::<CoreResult<Vec<_>>>().unwrap();
        assert_eq!(records.len(), 100);
        for (i, record) in (0..100u32).zip(&records) {
            assert_eq!(record, &i.to_le_bytes().repeat(i as usize % 9));
        }
        assert!(reader.stats().is_clean());
    }
}
