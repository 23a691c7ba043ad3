//! Benchmark utilities.

use extentlog_core::{LogWriter, WriterOptions};
use extentlog_storage::MemoryStream;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate random bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate text-like bytes that compress well.
pub fn text_data(size: usize) -> Vec<u8> {
    const WORDS: &[&str] = &["extent", "record", "append", "log", "checksum", "body"];
    let mut rng = StdRng::seed_from_u64(size as u64 ^ 0x5EED);
    let mut out = Vec::with_capacity(size + 16);
    while out.len() < size {
        out.extend_from_slice(WORDS[rng.gen_range(0..WORDS.len())].as_bytes());
        out.push(b' ');
    }
    out.truncate(size);
    out
}

/// Generate `count` records of `size` bytes.
pub fn generate_records(count: usize, size: usize, compressible: bool) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| {
            let mut record = if compressible {
                text_data(size)
            } else {
                random_data(size)
            };
            if let Some(first) = record.first_mut() {
                *first = i as u8;
            }
            record
        })
        .collect()
}

/// Encode `records` into an in-memory log.
pub fn encode_log(records: &[Vec<u8>], options: WriterOptions) -> Vec<u8> {
    let mut stream = MemoryStream::new();
    let mut writer = LogWriter::new(&mut stream, options).expect("writer");
    for record in records {
        writer.write_record(record).expect("write");
    }
    writer.flush().expect("flush");
    drop(writer);
    stream.data()
}
