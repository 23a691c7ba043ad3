//! Extent header layout and constants.

use super::checksum::header_checksum;
use super::error::ExtentError;
use crate::compression::Compression;

/// Magic bytes opening every extent; also the resynchronization marker.
pub const EXTENT_MAGIC: [u8; 4] = [0xD5, 0x7E, 0x1C, 0x0B];

/// Header size with a 1-byte body size: magic (4) + type (1) + size (1) + checksum (2).
pub const SHORT_HEADER_SIZE: usize = 8;

/// Header size with a 4-byte body size: magic (4) + type (1) + size (4) + checksum (2).
pub const LONG_HEADER_SIZE: usize = 11;

/// Largest possible header.
pub const MAX_HEADER_SIZE: usize = LONG_HEADER_SIZE;

/// Body checksum trailer size.
pub const TRAILER_SIZE: usize = 4;

/// Smallest extent carrying a body: short header, 1 body byte, trailer.
pub const MIN_EXTENT_SIZE: usize = SHORT_HEADER_SIZE + 1 + TRAILER_SIZE;

/// Largest stored or logical body, bounded by the 4-byte size field.
pub const MAX_BODY_SIZE: usize = u32::MAX as usize;

const FLAG_LONG_SIZE: u8 = 0b0000_0001;
const FLAG_COMPRESSED: u8 = 0b0000_0010;
const CODEC_SHIFT: u32 = 2;

/// The type byte of an extent header.
///
/// Bit 0 selects the 4-byte size field, bit 1 marks a compressed body, and
/// bits 2..7 hold the codec id configured when the extent was written
/// (recorded even when the body fell back to raw storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtentType(u8);

impl ExtentType {
    /// Builds a type byte.
    #[must_use]
    pub const fn new(long_size: bool, compressed: bool, codec_id: u8) -> Self {
        let mut byte = codec_id << CODEC_SHIFT;
        if long_size {
            byte |= FLAG_LONG_SIZE;
        }
        if compressed {
            byte |= FLAG_COMPRESSED;
        }
        Self(byte)
    }

    /// Wraps a raw type byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// Returns the raw type byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Whether the size field is 4 bytes wide.
    #[must_use]
    pub const fn has_long_size(self) -> bool {
        self.0 & FLAG_LONG_SIZE != 0
    }

    /// Whether the stored body is compressed.
    #[must_use]
    pub const fn is_compressed(self) -> bool {
        self.0 & FLAG_COMPRESSED != 0
    }

    /// The codec id recorded at write time.
    #[must_use]
    pub const fn codec_id(self) -> u8 {
        self.0 >> CODEC_SHIFT
    }

    /// Header length implied by the size width.
    #[must_use]
    pub const fn header_len(self) -> usize {
        if self.has_long_size() {
            LONG_HEADER_SIZE
        } else {
            SHORT_HEADER_SIZE
        }
    }
}

/// A header whose checksum has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtentHeader {
    /// The type byte.
    pub extent_type: ExtentType,
    /// Size of the stored body in bytes.
    pub body_size: u32,
}

impl ExtentHeader {
    /// Header length in bytes.
    #[must_use]
    pub const fn header_len(&self) -> usize {
        self.extent_type.header_len()
    }

    /// Total extent length: header, stored body and trailer.
    ///
    /// `None` if the length does not fit in `usize`, which can only happen
    /// on targets narrower than 64 bits.
    #[must_use]
    pub fn extent_len(&self) -> Option<usize> {
        usize::try_from(self.body_size)
            .ok()?
            .checked_add(self.header_len())?
            .checked_add(TRAILER_SIZE)
    }

    /// The codec recorded in the header, if known.
    #[must_use]
    pub fn codec(&self) -> Option<Compression> {
        Compression::from_id(self.extent_type.codec_id())
    }
}

/// Parses and verifies the header at the start of `input`.
///
/// The magic is compared against however many bytes are available, so a
/// partial header at the end of the input reports
/// [`ExtentError::Truncated`] rather than a mismatch. The size field is only
/// read after the header checksum has been verified.
///
/// # Errors
///
/// Returns `MagicMismatch`, `HeaderChecksumMismatch`, or `Truncated`.
pub fn peek_header(input: &[u8]) -> Result<ExtentHeader, ExtentError> {
    let probe = input.len().min(EXTENT_MAGIC.len());
    if input[..probe] != EXTENT_MAGIC[..probe] {
        return Err(ExtentError::MagicMismatch);
    }
    if input.len() < SHORT_HEADER_SIZE {
        return Err(ExtentError::Truncated {
            needed: SHORT_HEADER_SIZE,
        });
    }

    let extent_type = ExtentType::from_byte(input[4]);
    let header_len = extent_type.header_len();
    if input.len() < header_len {
        return Err(ExtentError::Truncated { needed: header_len });
    }

    let checksum_at = header_len - 2;
    let stored = u16::from_le_bytes([input[checksum_at], input[checksum_at + 1]]);
    let computed = header_checksum(&input[..checksum_at]);
    if stored != computed {
        return Err(ExtentError::HeaderChecksumMismatch { stored, computed });
    }

    let body_size = if extent_type.has_long_size() {
        u32::from_le_bytes([input[5], input[6], input[7], input[8]])
    } else {
        u32::from(input[5])
    };

    Ok(ExtentHeader {
        extent_type,
        body_size,
    })
}

/// Appends a header for a stored body of `stored_len` bytes to `out`.
pub(crate) fn write_header(out: &mut Vec<u8>, stored_len: u32, compressed: bool, codec_id: u8) {
    let start = out.len();
    let long_size = stored_len > u32::from(u8::MAX);
    let extent_type = ExtentType::new(long_size, compressed, codec_id);

    out.extend_from_slice(&EXTENT_MAGIC);
    out.push(extent_type.as_byte());
    if long_size {
        out.extend_from_slice(&stored_len.to_le_bytes());
    } else {
        // Safe: checked against u8::MAX above
        out.push(stored_len as u8);
    }
    let checksum = header_checksum(&out[start..]);
    out.extend_from_slice(&checksum.to_le_bytes());
}
