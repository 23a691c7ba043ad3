//! Sharded scanning over byte ranges.

use extentlog_core::{Compression, ReaderOptions, WriterOptions};
use extentlog_testkit::prelude::*;
use std::thread;

fn scan_partition(data: &[u8], cuts: &[u64]) -> (Vec<Vec<u8>>, u64) {
    let mut bounds = vec![0];
    bounds.extend_from_slice(cuts);
    bounds.push(data.len() as u64);
    bounds.dedup();

    let mut records = Vec::new();
    let mut skipped = 0;
    for pair in bounds.windows(2) {
        let outcome = scan(data, ReaderOptions::new().range(pair[0], pair[1]));
        skipped += outcome.stats.skipped_bytes;
        records.extend(outcome.items);
    }
    (records, skipped)
}

fn sample_log() -> (Vec<Vec<u8>>, Vec<u8>) {
    let records: Vec<Vec<u8>> = (0..60u32)
        .map(|i| format!("shard record {i} {}", "y".repeat((i % 11) as usize * 9)).into_bytes())
        .collect();
    let data = write_records(
        &records,
        WriterOptions::new()
            .compression(Compression::Zstd)
            .flush_threshold(96),
    );
    (records, data)
}

#[test]
fn every_partition_yields_each_record_once() {
    let (records, data) = sample_log();
    let len = data.len() as u64;

    let partitions: Vec<Vec<u64>> = vec![
        vec![],
        vec![len / 2],
        vec![1, 2, 3],
        (1..8).map(|i| i * len / 8).collect(),
        (1..len).step_by(17).collect(),
    ];
    for cuts in partitions {
        let (read, skipped) = scan_partition(&data, &cuts);
        assert_eq!(read, records, "cuts {cuts:?}");
        assert_eq!(skipped, 0, "cuts {cuts:?}");
    }
}

#[test]
fn shards_at_extent_boundaries() {
    let (records, data) = sample_log();
    let cuts: Vec<u64> = extent_spans(&data)
        .iter()
        .skip(1)
        .map(|span| span.start as u64)
        .collect();
    let (read, _) = scan_partition(&data, &cuts);
    assert_eq!(read, records);
}

#[test]
fn range_inside_one_extent_is_empty() {
    let (_, data) = sample_log();
    let spans = extent_spans(&data);
    let span = &spans[1];

    let outcome = scan(
        &data,
        ReaderOptions::new().range(span.start as u64 + 1, span.end as u64 - 1),
    );
    assert!(outcome.items.is_empty());
    assert_eq!(outcome.stats.skipped_bytes, 0);
}

#[test]
fn shards_scan_concurrently() {
    let (records, data) = sample_log();
    let len = data.len() as u64;
    let shards = 4;

    let handles: Vec<_> = (0..shards)
        .map(|i| {
            let data = data.clone();
            thread::spawn(move || {
                let start = i * len / shards;
                let end = (i + 1) * len / shards;
                scan(&data, ReaderOptions::new().range(start, end)).items
            })
        })
        .collect();

    let mut read = Vec::new();
    for handle in handles {
        read.extend(handle.join().unwrap());
    }
    assert_eq!(read, records);
}

#[test]
fn corruption_is_counted_by_the_owning_shard() {
    let (records, data) = sample_log();
    let spans = extent_spans(&data);
    let damaged = Corruption::FlipBit {
        offset: spans[3].start + 9,
        bit: 2,
    }
    .applied_to(&data);

    let mid = spans[6].start as u64;
    let first = scan(&damaged, ReaderOptions::new().range(0, mid));
    let second = scan(&damaged, ReaderOptions::new().range(mid, damaged.len() as u64));

    assert_eq!(first.stats.skipped_bytes, spans[3].len() as u64);
    assert_eq!(second.stats.skipped_bytes, 0);

    let full = read_all(&damaged);
    let mut combined = first.items;
    combined.extend(second.items);
    assert_eq!(combined, full.items);
    assert!(combined.len() < records.len());
}

#[test]
fn damage_across_a_cut_is_counted_once() {
    let (_, data) = sample_log();
    let spans = extent_spans(&data);
    let target = spans[3].clone();
    let damaged = Corruption::FlipBit {
        offset: target.start + 9,
        bit: 5,
    }
    .applied_to(&data);

    for chunk in [7, 64 * 1024] {
        for cut in [target.start + 1, target.start + target.len() / 2, target.end - 1] {
            let cut = cut as u64;
            let options = ReaderOptions::new().read_chunk_size(chunk);
            let first = scan(&damaged, options.clone().range(0, cut));
            let second = scan(&damaged, options.range(cut, damaged.len() as u64));

            assert_eq!(first.stats.skipped_bytes, target.len() as u64, "cut {cut}");
            assert_eq!(second.stats.skipped_bytes, 0, "cut {cut}");

            let mut combined = first.items;
            combined.extend(second.items);
            assert_eq!(combined, read_all(&damaged).items, "cut {cut}");
        }
    }
}
