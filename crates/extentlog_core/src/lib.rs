//! # extentlog core
//!
//! Block-structured append log codec.
//!
//! This crate provides:
//! - The extent wire format: framed, checksummed, optionally compressed
//!   units with a resynchronization magic
//! - [`LogWriter`], which batches records into extents and appends them to a
//!   [`ByteStream`](extentlog_storage::ByteStream)
//! - [`LogReader`], which scans a stream back into records, recovering from
//!   truncation, bit corruption and duplicated bytes
//! - The [`Message`] trait for structured records, with CBOR helpers
//!
//! ## Example
//!
//! ```rust
//! use extentlog_core::{Compression, LogReader, LogWriter, ReaderOptions, WriterOptions};
//! use extentlog_storage::MemoryStream;
//!
//! let mut stream = MemoryStream::new();
//! let options = WriterOptions::new().compression(Compression::Zstd);
//! let mut writer = LogWriter::new(&mut stream, options).unwrap();
//! for record in [&b""[..], b"a", b"ab"] {
//!     writer.write_record(record).unwrap();
//! }
//! writer.flush().unwrap();
//! drop(writer);
//!
//! let mut reader = LogReader::new(stream.share(), ReaderOptions::default()).unwrap();
//! let records: Vec<Vec<u8>> = reader.records().collect::<Result<_, _>>().unwrap();
//! assert_eq!(records, vec![b"".to_vec(), b"a".to_vec(), b"ab".to_vec()]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compression;
mod config;
mod error;
pub mod extent;
pub mod message;
mod reader;
pub mod record;
mod stats;
mod writer;

pub use compression::Compression;
pub use config::{ReaderOptions, WriterOptions, DEFAULT_FLUSH_THRESHOLD, DEFAULT_READ_CHUNK_SIZE};
pub use error::{CoreError, CoreResult};
pub use extent::ExtentError;
pub use message::Message;
pub use reader::{LogReader, Messages, Records};
pub use stats::{ReaderStats, WriterStats};
pub use writer::LogWriter;
