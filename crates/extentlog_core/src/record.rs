//! Packing of records inside an extent body.
//!
//! A body is a sequence of `| length (4, LE) | bytes (length) |` frames with
//! no padding. Empty records are legal and take four bytes.

use crate::error::{CoreError, CoreResult};
use std::ops::Range;

/// Size of the per-record length prefix.
pub const RECORD_PREFIX_SIZE: usize = 4;

/// Returns the framed size of a record of `len` bytes.
#[must_use]
pub const fn framed_len(len: usize) -> usize {
    RECORD_PREFIX_SIZE + len
}

/// Appends one framed record to `body`.
///
/// # Errors
///
/// Returns `InvalidArgument` if the record does not fit a `u32` length.
pub fn append_record(body: &mut Vec<u8>, record: &[u8]) -> CoreResult<()> {
    let len = u32::try_from(record.len()).map_err(|_| {
        CoreError::invalid_argument(format!(
            "record of {} bytes exceeds maximum of {}",
            record.len(),
            u32::MAX
        ))
    })?;
    body.reserve(framed_len(record.len()));
    body.extend_from_slice(&len.to_le_bytes());
    body.extend_from_slice(record);
    Ok(())
}

/// Splits a body into the byte ranges of its records.
///
/// Returns `None` unless the frames cover the body exactly. A body that
/// passed its checksum but does not split cleanly is treated as damaged as a
/// whole.
#[must_use]
pub fn split_records(body: &[u8]) -> Option<Vec<Range<usize>>> {
    let mut ranges = Vec::new();
    let mut pos = 0;
    while pos < body.len() {
        let prefix = body.get(pos..pos + RECORD_PREFIX_SIZE)?;
        let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        let start = pos + RECORD_PREFIX_SIZE;
        let end = start.checked_add(len).filter(|&end| end <= body.len())?;
        ranges.push(start..end);
        pos = end;
    }
    Some(ranges)
}
