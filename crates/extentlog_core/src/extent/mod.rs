//! Physical extents: the framed, checksummed unit appended to a stream.
//!
//! ## Extent Format
//!
//! ```text
//! | magic (4) | type (1) | body_size (1 or 4) | header_crc16 (2) | body (N) | body_crc32 (4) |
//! ```
//!
//! - `type` bit 0 selects a 4-byte little-endian `body_size`; the 1-byte form
//!   is used for stored bodies of at most 255 bytes.
//! - `type` bit 1 marks a compressed body; bits 2..7 hold the codec id.
//! - `header_crc16` covers `magic | type | body_size` and is checked before
//!   `body_size` is trusted.
//! - `body_crc32` covers the body as stored and is checked before
//!   decompression.
//!
//! ## Decode Outcomes
//!
//! Decoding never fails with a [`CoreError`](crate::CoreError). Every reason
//! an extent cannot be produced is an [`ExtentError`] value, and
//! [`ExtentError::Truncated`] is kept apart from the corruption variants so
//! that a reader can tell an in-progress tail from damage.

mod checksum;
mod codec;
mod error;
mod format;

pub use checksum::{body_checksum, header_checksum};
pub use codec::{decode, encode, EncodedExtent};
pub use error::ExtentError;
pub use format::{
    peek_header, ExtentHeader, ExtentType, EXTENT_MAGIC, LONG_HEADER_SIZE, MAX_BODY_SIZE,
    MAX_HEADER_SIZE, MIN_EXTENT_SIZE, SHORT_HEADER_SIZE, TRAILER_SIZE,
};

/// Returns the offset of the first position in `data` at or after `from`
/// where an extent could start.
///
/// A full magic match qualifies, and so does a prefix of the magic that runs
/// into the end of `data`, since the rest of it may not have arrived yet.
/// Returns `data.len()` when there is no candidate.
#[must_use]
pub fn find_magic(data: &[u8], from: usize) -> usize {
    let mut pos = from;
    while pos < data.len() {
        let rest = &data[pos..];
        let probe = rest.len().min(EXTENT_MAGIC.len());
        if rest[..probe] == EXTENT_MAGIC[..probe] {
            return pos;
        }
        pos += 1;
    }
    data.len()
}
