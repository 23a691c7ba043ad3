//! # extentlog storage
//!
//! Byte stream trait and implementations for extentlog.
//!
//! This crate provides the lowest-level I/O abstraction used by the log
//! codec. Streams are **opaque byte sequences** - they do not interpret the
//! extents written through them.
//!
//! ## Design Principles
//!
//! - Streams are sequential: reads advance a cursor, writes append
//! - A read returning `0` means "nothing available right now", not "closed";
//!   a later read may observe bytes appended in the meantime
//! - No knowledge of extents, checksums or records
//! - Ownership is explicit: lend a stream with `&mut S`, hand it over with
//!   `S` or `Box<S>`
//!
//! ## Available Streams
//!
//! - [`MemoryStream`] - Shared in-memory buffer, for tests and ephemeral logs
//! - [`FileStream`] - Persistent stream using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use extentlog_storage::{ByteStream, MemoryStream};
//!
//! let mut stream = MemoryStream::new();
//! stream.write(b"hello world").unwrap();
//!
//! let mut buf = [0u8; 5];
//! let n = stream.read(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"hello");
//! assert_eq!(stream.tell().unwrap(), 5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod stream;

pub use error::{StreamError, StreamResult};
pub use file::FileStream;
pub use memory::MemoryStream;
pub use stream::ByteStream;
