//! Corruption injection for encoded logs.
//!
//! Mutations operate on the raw bytes of a log. [`extent_spans`] finds the
//! extent boundaries of a clean log so tests can aim a mutation at one
//! extent and check that the others survive.

use extentlog_core::extent::{self, SHORT_HEADER_SIZE};
use std::ops::Range;

/// One mutation of a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    /// Flip one bit.
    FlipBit {
        /// Byte offset.
        offset: usize,
        /// Bit index, 0 to 7.
        bit: u8,
    },
    /// Overwrite one byte; a no-op value is replaced by its complement.
    SetByte {
        /// Byte offset.
        offset: usize,
        /// New value.
        value: u8,
    },
    /// Remove a byte run.
    Delete {
        /// Start of the run.
        offset: usize,
        /// Length of the run.
        len: usize,
    },
    /// Insert bytes before `offset`.
    Insert {
        /// Insertion point.
        offset: usize,
        /// Bytes to insert.
        bytes: Vec<u8>,
    },
    /// Copy a byte run and insert the copy right after it.
    Duplicate {
        /// Start of the run.
        offset: usize,
        /// Length of the run.
        len: usize,
    },
    /// Cut the buffer to `len` bytes.
    Truncate {
        /// New length.
        len: usize,
    },
}

impl Corruption {
    /// Applies the mutation. Offsets past the end are clamped.
    pub fn apply(&self, data: &mut Vec<u8>) {
        match self {
            Self::FlipBit { offset, bit } => {
                if let Some(byte) = data.get_mut(*offset) {
                    *byte ^= 1 << (bit % 8);
                }
            }
            Self::SetByte { offset, value } => {
                if let Some(byte) = data.get_mut(*offset) {
                    *byte = if *byte == *value { !*value } else { *value };
                }
            }
            Self::Delete { offset, len } => {
                let range = clamp(*offset, *len, data.len());
                data.drain(range);
            }
            Self::Insert { offset, bytes } => {
                let at = (*offset).min(data.len());
                data.splice(at..at, bytes.iter().copied());
            }
            Self::Duplicate { offset, len } => {
                let range = clamp(*offset, *len, data.len());
                let end = range.end;
                let copy = data[range].to_vec();
                data.splice(end..end, copy);
            }
            Self::Truncate { len } => data.truncate(*len),
        }
    }

    /// Returns a mutated copy.
    #[must_use]
    pub fn applied_to(&self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply(&mut out);
        out
    }
}

fn clamp(offset: usize, len: usize, data_len: usize) -> Range<usize> {
    let start = offset.min(data_len);
    let end = start.saturating_add(len).min(data_len);
    start..end
}

/// Returns the byte span of every extent in a clean log.
///
/// Stops at the first position that does not decode.
#[must_use]
pub fn extent_spans(data: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut body = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        match extent::decode(&data[pos..], &mut body) {
            Ok(len) => {
                spans.push(pos..pos + len);
                pos += len;
            }
            Err(_) => break,
        }
    }
    spans
}

/// Mutations that each damage exactly the extent at `span`.
///
/// Covers a body bit flip, a header byte overwrite, a deletion inside the
/// body, an insertion inside the body, a trailer bit flip, and a magic
/// overwrite.
#[must_use]
pub fn damage_extent(span: &Range<usize>) -> Vec<Corruption> {
    let body_start = span.start + SHORT_HEADER_SIZE;
    let last = span.end - 1;
    vec![
        Corruption::FlipBit {
            offset: body_start,
            bit: 3,
        },
        Corruption::SetByte {
            offset: span.start + 5,
            value: 0xEE,
        },
        Corruption::Delete {
            offset: body_start + 1,
            len: 2,
        },
        Corruption::Insert {
            offset: body_start + 1,
            bytes: vec![0x55; 3],
        },
        Corruption::FlipBit {
            offset: last,
            bit: 0,
        },
        Corruption::SetByte {
            offset: span.start,
            value: 0x00,
        },
    ]
}
