//! Test fixtures and log helpers.
//!
//! Provides convenience functions for writing logs into memory or temporary
//! files and scanning them back, plus message types for mixed-content tests.

use extentlog_core::message::{from_cbor, to_cbor};
use extentlog_core::{
    CoreError, CoreResult, LogReader, LogWriter, Message, ReaderOptions, ReaderStats,
    WriterOptions,
};
use extentlog_storage::{ByteStream, FileStream, MemoryStream};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tempfile::TempDir;

/// Everything a full scan of a log produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanOutcome<T = Vec<u8>> {
    /// Records or messages, in stream order.
    pub items: Vec<T>,
    /// Reader counters after the scan.
    pub stats: ReaderStats,
    /// Bytes left undecoded.
    pub unconsumed: usize,
}

impl<T> ScanOutcome<T> {
    /// Returns `true` if no bytes or records were skipped and nothing is
    /// left over.
    pub fn is_clean(&self) -> bool {
        self.stats.is_clean() && self.unconsumed == 0
    }
}

/// Writes `records` to a new in-memory log, flushes, and returns the bytes.
pub fn write_records<R: AsRef<[u8]>>(records: &[R], options: WriterOptions) -> Vec<u8> {
    let mut stream = MemoryStream::new();
    write_records_to(&mut stream, records, options);
    stream.data()
}

/// Writes `records` to `stream` and flushes.
pub fn write_records_to<S: ByteStream, R: AsRef<[u8]>>(
    stream: S,
    records: &[R],
    options: WriterOptions,
) {
    let mut writer = LogWriter::new(stream, options).expect("Failed to create writer");
    for record in records {
        writer
            .write_record(record.as_ref())
            .expect("Failed to write record");
    }
    writer.flush().expect("Failed to flush writer");
}

/// Writes each record as its own extent and returns the bytes.
pub fn write_extents<R: AsRef<[u8]>>(records: &[R]) -> Vec<u8> {
    write_records(records, WriterOptions::new().flush_threshold(1))
}

/// Scans `data` as records with default options.
pub fn read_all(data: &[u8]) -> ScanOutcome {
    scan(data, ReaderOptions::default())
}

/// Scans `data` as records.
pub fn scan(data: &[u8], options: ReaderOptions) -> ScanOutcome {
    let stream = MemoryStream::with_data(data.to_vec());
    scan_stream(stream, options).expect("Failed to scan log")
}

/// Scans a stream until no further record is available.
pub fn scan_stream<S: ByteStream>(stream: S, options: ReaderOptions) -> CoreResult<ScanOutcome> {
    let mut reader = LogReader::new(stream, options)?;
    let items = reader.records().collect::<CoreResult<Vec<_>>>()?;
    Ok(ScanOutcome {
        items,
        stats: reader.stats(),
        unconsumed: reader.unconsumed_bytes(),
    })
}

/// Scans `data` as messages of type `M`.
pub fn scan_messages<M: Message>(data: &[u8], options: ReaderOptions) -> ScanOutcome<M> {
    let mut reader = LogReader::new(MemoryStream::with_data(data.to_vec()), options)
        .expect("Failed to create reader");
    let items = reader
        .messages::<M>()
        .collect::<CoreResult<Vec<_>>>()
        .expect("Failed to scan messages");
    ScanOutcome {
        items,
        stats: reader.stats(),
        unconsumed: reader.unconsumed_bytes(),
    }
}

/// A log file in a temporary directory removed on drop.
pub struct TempLog {
    /// Path of the log file.
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TempLog {
    /// Creates an empty log file in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("test.log");
        FileStream::create(&path).expect("Failed to create log file");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Opens the file for appending.
    pub fn appender(&self) -> FileStream {
        FileStream::open_append(&self.path).expect("Failed to open log for append")
    }

    /// Opens the file for reading from the start.
    pub fn reader(&self) -> FileStream {
        FileStream::open_read(&self.path).expect("Failed to open log for read")
    }

    /// Returns the file contents.
    pub fn bytes(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read log file")
    }
}

impl Default for TempLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A CBOR-encoded message with a required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    /// Sequence number.
    pub seq: u64,
    /// Event name; must not be empty.
    pub name: String,
    /// Opaque payload.
    pub payload: Vec<u8>,
}

impl TestEvent {
    /// Creates an event named `event-<seq>`.
    pub fn numbered(seq: u64) -> Self {
        Self {
            seq,
            name: format!("event-{seq}"),
            payload: seq.to_le_bytes().to_vec(),
        }
    }
}

impl Message for TestEvent {
    fn encode(&self) -> CoreResult<Vec<u8>> {
        to_cbor(self)
    }

    fn decode(bytes: &[u8]) -> CoreResult<Self> {
        from_cbor(bytes)
    }

    fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A JSON-encoded message, for logs mixing encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonNote {
    /// Note text.
    pub text: String,
}

impl Message for JsonNote {
    fn encode(&self) -> CoreResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::message(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> CoreResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read() {
        let data = write_records(&["one", "two"], WriterOptions::default());
        let outcome = read_all(&data);
        assert_eq!(outcome.items, vec![b"one".to_vec(), b"two".to_vec()]);
        assert!(outcome.is_clean());
    }

    #[test]
    fn temp_log_roundtrip() {
        let log = TempLog::new();
        write_records_to(log.appender(), &["on disk"], WriterOptions::default());
        let outcome = scan_stream(log.reader(), ReaderOptions::default()).unwrap();
        assert_eq!(outcome.items, vec![b"on disk".to_vec()]);
        assert_eq!(log.bytes().len(), 8 + 11 + 4);
    }

    #[test]
    fn test_event_validation() {
        assert!(TestEvent::numbered(1).is_valid());
        let unnamed = TestEvent {
            seq: 2,
            name: String::new(),
            payload: Vec::new(),
        };
        assert!(!unnamed.is_valid());

        let bytes = TestEvent::numbered(3).encode().unwrap();
        assert_eq!(TestEvent::decode(&bytes).unwrap(), TestEvent::numbered(3));
    }
}
