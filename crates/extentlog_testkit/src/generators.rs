//! Property-based test generators using proptest.
//!
//! Provides strategies for records, writer configurations and corruptions.

use crate::corruption::Corruption;
use extentlog_core::{Compression, WriterOptions};
use proptest::prelude::*;

/// Strategy for a single record, empty ones included.
pub fn record_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        1 => Just(Vec::new()),
        6 => prop::collection::vec(any::<u8>(), 1..64),
        2 => (any::<u8>(), 64usize..2048).prop_map(|(byte, len)| vec![byte; len]),
        1 => prop::collection::vec(any::<u8>(), 256..1024),
    ]
}

/// Strategy for a sequence of records.
pub fn records_strategy(max_records: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(record_strategy(), 0..max_records)
}

/// Strategy for a body codec.
pub fn compression_strategy() -> impl Strategy<Value = Compression> {
    prop::sample::select(Compression::ALL.to_vec())
}

/// Strategy for writer options with small thresholds, so that logs span
/// many extents.
pub fn writer_options_strategy() -> impl Strategy<Value = WriterOptions> {
    (compression_strategy(), 1usize..512).prop_map(|(compression, threshold)| {
        WriterOptions::new()
            .compression(compression)
            .flush_threshold(threshold)
    })
}

/// Strategy for an arbitrary mutation of a buffer of `len` bytes.
pub fn corruption_strategy(len: usize) -> impl Strategy<Value = Corruption> {
    let len = len.max(1);
    prop_oneof![
        (0..len, 0u8..8).prop_map(|(offset, bit)| Corruption::FlipBit { offset, bit }),
        (0..len, any::<u8>()).prop_map(|(offset, value)| Corruption::SetByte { offset, value }),
        (0..len, 1usize..16).prop_map(|(offset, len)| Corruption::Delete { offset, len }),
        (0..len, prop::collection::vec(any::<u8>(), 1..16))
            .prop_map(|(offset, bytes)| Corruption::Insert { offset, bytes }),
        (0..len, 1usize..64).prop_map(|(offset, len)| Corruption::Duplicate { offset, len }),
        (0..len).prop_map(|len| Corruption::Truncate { len }),
    ]
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
