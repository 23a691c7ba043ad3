//! Compression codecs for extent bodies.
//!
//! The set of codecs is closed: every extent records the id of the codec it
//! was written with, so a reader never depends on how the writer was
//! configured.

use crate::error::{CoreError, CoreResult};
use crate::extent::MAX_BODY_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Default compression level for zstd.
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Compression applied to extent bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Compression {
    /// Bodies are stored as written.
    #[default]
    None = 0,
    /// Zstandard.
    Zstd = 1,
    /// LZ4 block format with the uncompressed size prepended.
    Lz4 = 2,
}

impl Compression {
    /// Every supported codec.
    pub const ALL: [Compression; 3] = [Compression::None, Compression::Zstd, Compression::Lz4];

    /// Returns the codec for an id stored in an extent header.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::None),
            1 => Some(Self::Zstd),
            2 => Some(Self::Lz4),
            _ => None,
        }
    }

    /// Returns the id stored in extent headers.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the lowercase codec name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zstd => "zstd",
            Self::Lz4 => "lz4",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compression {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "raw" => Ok(Self::None),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            other => Err(CoreError::invalid_argument(format!(
                "unknown compression codec: {other}"
            ))),
        }
    }
}

/// Compresses `data` with the given codec.
///
/// `level` only applies to zstd.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn compress(data: &[u8], compression: Compression, level: i32) -> CoreResult<Vec<u8>> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Zstd => compress_zstd(data, level),
        Compression::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
    }
}

/// Decompresses `data` written with the given codec.
///
/// Output is capped at [`MAX_BODY_SIZE`] bytes.
///
/// # Errors
///
/// Returns an error if `data` is not a valid stream for the codec or
/// expands past the cap.
pub fn decompress(data: &[u8], compression: Compression) -> CoreResult<Vec<u8>> {
    decompress_bounded(data, compression, MAX_BODY_SIZE)
}

/// Decompresses `data`, failing once the output would exceed `limit` bytes.
///
/// # Errors
///
/// Returns an error if `data` is not a valid stream for the codec or
/// expands past `limit`.
pub fn decompress_bounded(
    data: &[u8],
    compression: Compression,
    limit: usize,
) -> CoreResult<Vec<u8>> {
    match compression {
        Compression::None if data.len() > limit => Err(over_limit(data.len(), limit)),
        Compression::None => Ok(data.to_vec()),
        Compression::Zstd => decompress_zstd(data, limit),
        Compression::Lz4 => decompress_lz4(data, limit),
    }
}

fn over_limit(len: usize, limit: usize) -> CoreError {
    CoreError::compression(format!(
        "decompressed size {len} exceeds limit of {limit} bytes"
    ))
}

/// Upper bound of the LZ4 block expansion ratio.
const LZ4_MAX_RATIO: usize = 255;

fn decompress_lz4(data: &[u8], limit: usize) -> CoreResult<Vec<u8>> {
    // Reject impossible size prefixes before lz4_flex allocates for them.
    if let Some(prefix) = data.get(..4) {
        let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        let limit = (data.len() - 4).saturating_mul(LZ4_MAX_RATIO).saturating_add(16);
        if declared > limit {
            return Err(CoreError::compression(format!(
                "lz4 size prefix {declared} exceeds what {} bytes can expand to",
                data.len() - 4
            )));
        }
        if declared > limit {
            return Err(over_limit(declared, limit));
        }
    }
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| CoreError::compression(format!("failed to decompress lz4 data: {e}")))
}

fn compress_zstd(data: &[u8], level: i32) -> CoreResult<Vec<u8>> {
    let mut encoder = zstd::Encoder::new(Vec::new(), level)
        .map_err(|e| CoreError::compression(format!("failed to create zstd encoder: {e}")))?;

    encoder
        .write_all(data)
        .map_err(|e| CoreError::compression(format!("failed to write to zstd encoder: {e}")))?;

    encoder
        .finish()
        .map_err(|e| CoreError::compression(format!("failed to finish zstd compression: {e}")))
}

fn decompress_zstd(data: &[u8], limit: usize) -> CoreResult<Vec<u8>> {
    let decoder = zstd::Decoder::new(data)
        .map_err(|e| CoreError::compression(format!("failed to create zstd decoder: {e}")))?;

    // One byte past the limit is enough to tell an oversized frame apart.
    let mut output = Vec::new();
    decoder
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut output)
        .map_err(|e| CoreError::compression(format!("failed to decompress zstd data: {e}")))?;

    if output.len() > limit {
        return Err(over_limit(output.len(), limit));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zstd_roundtrip() {
        let data = b"Hello, World! This is a test of zstd compression.".repeat(8);
        let compressed = compress(&data, Compression::Zstd, DEFAULT_ZSTD_LEVEL).unwrap();
        assert!(compressed.len() < data.len());
        let decompressed = decompress(&compressed, Compression::Zstd).unwrap();
        assert_eq!(data, decompressed);
    }

    #[test]
    fn lz4_roundtrip() {
        let data = b"Hello, World! This is a test of lz4 compression.".repeat(8);
        let compressed = compress(&data, Compression::Lz4, 0).unwrap();
        let decompressed = decompress(&compressed, Compression::Lz4).unwrap();
        assert_eq!(data, decompressed);
    }

    #[test]
    fn none_is_identity() {
        let data = b"Hello, World!";
        let compressed = compress(data, Compression::None, 0).unwrap();
        assert_eq!(data.as_slice(), compressed.as_slice());
    }

    #[test]
    fn garbage_fails_to_decompress() {
        let garbage = [0xFFu8; 32];
        assert!(decompress(&garbage, Compression::Zstd).is_err());
        assert!(decompress(&garbage, Compression::Lz4).is_err());
    }

    #[test]
    fn output_is_capped() {
        let data = vec![0u8; 64 * 1024];
        for codec in Compression::ALL {
            let compressed = compress(&data, codec, DEFAULT_ZSTD_LEVEL).unwrap();
            let err = decompress_bounded(&compressed, codec, 1024).unwrap_err();
            assert!(matches!(err, CoreError::Compression { .. }), "{codec}");
            assert_eq!(
                decompress_bounded(&compressed, codec, data.len()).unwrap(),
                data
            );
        }
    }

    #[test]
    fn ids_roundtrip() {
        for codec in Compression::ALL {
            assert_eq!(Compression::from_id(codec.id()), Some(codec));
        }
        assert_eq!(Compression::from_id(63), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("zstd".parse::<Compression>().unwrap(), Compression::Zstd);
        assert_eq!("LZ4".parse::<Compression>().unwrap(), Compression::Lz4);
        assert_eq!("raw".parse::<Compression>().unwrap(), Compression::None);
        assert!("brotli".parse::<Compression>().is_err());
        assert_eq!(Compression::Zstd.to_string(), "zstd");
    }
}
