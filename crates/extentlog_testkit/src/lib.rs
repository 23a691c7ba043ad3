//! # extentlog testkit
//!
//! Test utilities for extentlog.
//!
//! This crate provides:
//! - Log fixtures: write records to memory or temporary files and scan
//!   them back into a [`ScanOutcome`]
//! - Corruption injection aimed at whole logs or single extents
//! - A crashable stream for partial-write and failed-flush scenarios
//! - Property-based test generators using proptest
//! - Fuzz harnesses for the extent decoder and the reader
//!
//! ## Usage
//!
//! ```rust
//! use extentlog_core::WriterOptions;
//! use extentlog_testkit::prelude::*;
//!
//! let data = write_records(&["a", "b"], WriterOptions::default());
//! let damaged = Corruption::Truncate { len: data.len() - 1 }.applied_to(&data);
//! let outcome = read_all(&damaged);
//! assert!(outcome.items.is_empty());
//! assert_eq!(outcome.stats.skipped_bytes, damaged.len() as u64);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod corruption;
pub mod crash;
pub mod fixtures;
pub mod fuzz;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::corruption::*;
    pub use crate::crash::*;
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
}

pub use corruption::*;
pub use crash::*;
pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
