//! Extent decode outcomes that are not a decoded extent.

use thiserror::Error;

/// Why a byte run could not be decoded as an extent.
///
/// These are data, not failures: the reader chooses a recovery policy per
/// variant (resynchronize, wait for more bytes, or drop a tail).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtentError {
    /// The bytes at the cursor are not the extent magic.
    #[error("magic mismatch")]
    MagicMismatch,

    /// The header checksum does not cover `magic | type | body_size`.
    #[error("header checksum mismatch: stored {stored:04x}, computed {computed:04x}")]
    HeaderChecksumMismatch {
        /// Checksum stored in the header.
        stored: u16,
        /// Checksum computed over the header prefix.
        computed: u16,
    },

    /// The trailer checksum does not cover the stored body.
    #[error("body checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    BodyChecksumMismatch {
        /// Checksum stored in the trailer.
        stored: u32,
        /// Checksum computed over the stored body.
        computed: u32,
    },

    /// A checksummed header names a codec this build does not know.
    #[error("unknown codec id {0}")]
    UnknownCodec(u8),

    /// A checksummed body failed to decompress.
    #[error("body failed to decompress: {0}")]
    Decompression(String),

    /// A checksummed header declares an extent longer than this target can
    /// address.
    #[error("extent with a {body_size} byte body does not fit in memory")]
    Oversized {
        /// Body size declared by the header.
        body_size: u32,
    },

    /// Fewer bytes are available than the extent needs.
    #[error("truncated extent: {needed} bytes needed")]
    Truncated {
        /// Bytes needed from the cursor to make progress.
        needed: usize,
    },
}

impl ExtentError {
    /// Returns `true` if more bytes could turn this into a decodable extent.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Short stable label used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MagicMismatch => "magic_mismatch",
            Self::HeaderChecksumMismatch { .. } => "header_checksum_mismatch",
            Self::BodyChecksumMismatch { .. } => "body_checksum_mismatch",
            Self::UnknownCodec(_) => "unknown_codec",
            Self::Decompression(_) => "decompression",
            Self::Oversized { .. } => "oversized",
            Self::Truncated { .. } => "truncated",
        }
    }
}
