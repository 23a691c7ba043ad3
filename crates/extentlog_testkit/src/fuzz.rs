//! Fuzz harnesses for extentlog.
//!
//! These functions take arbitrary bytes and must never panic. They can be
//! driven by cargo-fuzz or by proptest.

use extentlog_core::extent;
use extentlog_core::{LogReader, ReaderOptions};
use extentlog_storage::MemoryStream;

/// Fuzz target for single-extent decoding.
///
/// Tests that arbitrary byte sequences either decode to a body or return an
/// [`extent::ExtentError`], and that a decoded extent re-decodes from its
/// own span.
pub fn fuzz_extent_decode(data: &[u8]) {
    let mut body = Vec::new();
    if let Ok(consumed) = extent::decode(data, &mut body) {
        assert!(consumed <= data.len(), "consumed past the input");
        let mut again = Vec::new();
        assert_eq!(extent::decode(&data[..consumed], &mut again), Ok(consumed));
        assert_eq!(body, again, "decode is not deterministic");
    }
}

/// Fuzz target for the reader.
///
/// Scans arbitrary bytes under both tail policies and checks the byte
/// accounting: every input byte is either inside a decoded extent, skipped,
/// or (resume mode only) left unconsumed.
pub fn fuzz_reader(data: &[u8]) {
    for resume in [false, true] {
        let options = ReaderOptions::new()
            .resume_incomplete_tail(resume)
            .read_chunk_size(7);
        let Ok(mut reader) = LogReader::new(MemoryStream::with_data(data.to_vec()), options) else {
            return;
        };
        while let Ok(Some(_)) = reader.read_record() {}

        let stats = reader.stats();
        let consumed = reader.position();
        assert_eq!(consumed + reader.unconsumed_bytes() as u64, data.len() as u64);
        assert!(stats.skipped_bytes <= consumed);
        if !resume {
            assert_eq!(reader.unconsumed_bytes(), 0);
        }
    }
}
