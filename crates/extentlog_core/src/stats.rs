//! Writer and reader counters.
//!
//! Both structs are plain snapshots: the writer and reader are single
//! threaded, so counters are updated in place and copied out by `stats()`.

/// Counters kept by a [`LogWriter`](crate::LogWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterStats {
    /// Records accepted.
    pub records: u64,
    /// Extents written to the stream.
    pub extents: u64,
    /// Logical body bytes, before compression.
    pub logical_bytes: u64,
    /// Bytes written to the stream, headers and trailers included.
    pub stored_bytes: u64,
    /// Extents stored compressed.
    pub compressed_extents: u64,
    /// Extents where a codec was configured but the raw body was smaller.
    pub raw_fallbacks: u64,
    /// Stream flushes issued.
    pub flushes: u64,
}

impl WriterStats {
    pub(crate) fn record_extent(
        &mut self,
        logical: usize,
        stored: usize,
        compressed: bool,
        fallback: bool,
    ) {
        self.extents += 1;
        self.logical_bytes += logical as u64;
        self.stored_bytes += stored as u64;
        if compressed {
            self.compressed_extents += 1;
        }
        if fallback {
            self.raw_fallbacks += 1;
        }
    }

    /// Ratio of stored to logical bytes, or `1.0` before anything is written.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.logical_bytes == 0 {
            1.0
        } else {
            self.stored_bytes as f64 / self.logical_bytes as f64
        }
    }
}

/// Counters kept by a [`LogReader`](crate::LogReader).
///
/// Every field only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderStats {
    /// Records returned to the caller, raw or as messages.
    pub records: u64,
    /// Extents decoded.
    pub extents: u64,
    /// Bytes that could not be decoded and were skipped.
    pub skipped_bytes: u64,
    /// Records skipped because they did not parse as the requested message.
    pub skipped_records: u64,
    /// Times the reader resynchronized after corruption.
    pub resyncs: u64,
}

impl ReaderStats {
    /// Returns `true` if nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped_bytes == 0 && self.skipped_records == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        assert_eq!(WriterStats::default().extents, 0);
        assert!(ReaderStats::default().is_clean());
    }

    #[test]
    fn record_extents() {
        let mut stats = WriterStats::default();
        stats.record_extent(100, 40, true, false);
        stats.record_extent(10, 23, false, true);

        assert_eq!(stats.extents, 2);
        assert_eq!(stats.logical_bytes, 110);
        assert_eq!(stats.stored_bytes, 63);
        assert_eq!(stats.compressed_extents, 1);
        assert_eq!(stats.raw_fallbacks, 1);
        assert!(stats.compression_ratio() < 1.0);
    }

    #[test]
    fn empty_ratio_is_one() {
        assert!((WriterStats::default().compression_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
