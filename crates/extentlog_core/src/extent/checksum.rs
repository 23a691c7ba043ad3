//! Header and body checksums.
//!
//! - Body: CRC-32 (IEEE polynomial, as in zlib/gzip) via `crc32fast`.
//! - Header: CRC-16/CCITT-FALSE (polynomial 0x1021, init 0xFFFF), which
//!   catches every burst of up to 16 bits inside the 5 to 9 header bytes.

/// Computes the 4-byte body checksum over the body exactly as stored.
#[must_use]
pub fn body_checksum(stored_body: &[u8]) -> u32 {
    crc32fast::hash(stored_body)
}

/// Computes the 2-byte header checksum over `magic | type | body_size`.
#[must_use]
pub fn header_checksum(header_prefix: &[u8]) -> u16 {
    const CRC16_TABLE: [u16; 256] = {
        let mut table = [0u16; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = (i as u16) << 8;
            let mut j = 0;
            while j < 8 {
                if crc & 0x8000 != 0 {
                    crc = (crc << 1) ^ 0x1021;
                } else {
                    crc <<= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_u16;
    for &byte in header_prefix {
        let index = ((crc >> 8) ^ u16::from(byte)) & 0xFF;
        crc = (crc << 8) ^ CRC16_TABLE[index as usize];
    }
    crc
}
