//! Encoding and decoding of single extents.

use super::checksum::body_checksum;
use super::error::ExtentError;
use super::format::{peek_header, write_header, MAX_BODY_SIZE, TRAILER_SIZE};
use crate::compression::{self, Compression};
use crate::error::{CoreError, CoreResult};

/// What [`encode`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedExtent {
    /// Whether the stored body is compressed.
    pub compressed: bool,
    /// Size of the stored body.
    pub stored_len: usize,
    /// Total bytes appended, header and trailer included.
    pub extent_len: usize,
}

/// Frames `body` as one extent and appends it to `out`.
///
/// The body is compressed with `compression` and the compressed form is kept
/// only when it is strictly smaller; otherwise the raw body is stored with
/// the compressed flag cleared. The configured codec id is recorded either
/// way.
///
/// # Errors
///
/// Returns `InvalidArgument` if the body does not fit the 4-byte size field,
/// or `Compression` if the encoder fails. Nothing is appended on error.
pub fn encode(
    body: &[u8],
    compression: Compression,
    level: i32,
    out: &mut Vec<u8>,
) -> CoreResult<EncodedExtent> {
    if body.len() > MAX_BODY_SIZE {
        return Err(CoreError::invalid_argument(format!(
            "extent body of {} bytes exceeds maximum of {MAX_BODY_SIZE}",
            body.len()
        )));
    }

    let compressed_body = match compression {
        Compression::None => None,
        codec => {
            let candidate = compression::compress(body, codec, level)?;
            (candidate.len() < body.len()).then_some(candidate)
        }
    };
    let compressed = compressed_body.is_some();
    let stored: &[u8] = compressed_body.as_deref().unwrap_or(body);

    let start = out.len();
    // Safe: stored is never larger than body, which was checked above
    write_header(out, stored.len() as u32, compressed, compression.id());
    out.extend_from_slice(stored);
    out.extend_from_slice(&body_checksum(stored).to_le_bytes());

    Ok(EncodedExtent {
        compressed,
        stored_len: stored.len(),
        extent_len: out.len() - start,
    })
}

/// Decodes the extent at the start of `input` into `body`.
///
/// On success `body` holds the logical (decompressed) body and the number
/// of input bytes the extent occupies is returned. Validation runs in wire
/// order: magic, header checksum, codec id, availability of the body and
/// trailer, body checksum, then decompression. `body` is left cleared on
/// error.
///
/// # Errors
///
/// Returns an [`ExtentError`] describing why no extent could be decoded.
pub fn decode(input: &[u8], body: &mut Vec<u8>) -> Result<usize, ExtentError> {
    body.clear();

    let header = peek_header(input)?;
    let codec_id = header.extent_type.codec_id();
    let codec = header.codec().ok_or(ExtentError::UnknownCodec(codec_id))?;

    let total = header.extent_len().ok_or(ExtentError::Oversized {
        body_size: header.body_size,
    })?;
    if input.len() < total {
        return Err(ExtentError::Truncated { needed: total });
    }

    let body_start = header.header_len();
    let body_end = body_start + header.body_size as usize;
    let stored = &input[body_start..body_end];
    let trailer = &input[body_end..body_end + TRAILER_SIZE];
    let stored_checksum = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let computed = body_checksum(stored);
    if stored_checksum != computed {
        return Err(ExtentError::BodyChecksumMismatch {
            stored: stored_checksum,
            computed,
        });
    }

    if header.extent_type.is_compressed() && codec != Compression::None {
        *body = compression::decompress_bounded(stored, codec, MAX_BODY_SIZE)
            .map_err(|e| ExtentError::Decompression(e.to_string()))?;
    } else {
        body.extend_from_slice(stored);
    }

    Ok(total)
}
