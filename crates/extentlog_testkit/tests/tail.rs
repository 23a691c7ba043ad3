//! Tail handling: default skip policy and resume policy.

use extentlog_core::{Compression, LogReader, ReaderOptions, WriterOptions};
use extentlog_storage::{ByteStream, MemoryStream};
use extentlog_testkit::prelude::*;

fn log_with_spans() -> (Vec<Vec<u8>>, Vec<u8>, Vec<std::ops::Range<usize>>) {
    let records: Vec<Vec<u8>> = (0..4u8).map(|i| vec![b'0' + i; 40 + i as usize]).collect();
    let data = write_extents(&records);
    let spans = extent_spans(&data);
    (records, data, spans)
}

#[test]
fn truncated_tail_is_skipped_by_default() {
    let (records, data, spans) = log_with_spans();
    let last = spans.last().unwrap().clone();

    for cut in [last.start + 1, last.start + 4, last.start + 8, last.end - 1] {
        let outcome = read_all(&data[..cut]);
        assert_eq!(outcome.items, records[..3], "cut at {cut}");
        assert_eq!(outcome.stats.skipped_bytes, (cut - last.start) as u64);
        assert_eq!(outcome.unconsumed, 0);
    }
}

#[test]
fn truncated_tail_is_held_in_resume_mode() {
    let (records, data, spans) = log_with_spans();
    let last = spans.last().unwrap().clone();
    let options = ReaderOptions::new().resume_incomplete_tail(true);

    for cut in [last.start + 2, last.start + 9, last.end - 1] {
        let outcome = scan(&data[..cut], options.clone());
        assert_eq!(outcome.items, records[..3], "cut at {cut}");
        assert_eq!(outcome.stats.skipped_bytes, 0);
        assert_eq!(outcome.unconsumed, cut - last.start);
    }
}

#[test]
fn held_tail_completes_once_the_rest_arrives() {
    let (records, data, spans) = log_with_spans();
    let last = spans.last().unwrap().clone();
    let cut = last.start + 10;

    let stream = MemoryStream::with_data(data[..cut].to_vec());
    let mut appender = stream.share();
    let options = ReaderOptions::new().resume_incomplete_tail(true);
    let mut reader = LogReader::new(stream, options).unwrap();

    let mut read = Vec::new();
    while let Some(record) = reader.read_record_owned().unwrap() {
        read.push(record);
    }
    assert_eq!(read, records[..3]);
    assert_eq!(reader.unconsumed_bytes(), cut - last.start);

    // Deliver the remainder in two pieces; the first is still incomplete.
    let middle = cut + (last.end - cut) / 2;
    appender.write(&data[cut..middle]).unwrap();
    assert_eq!(reader.read_record().unwrap(), None);
    assert_eq!(reader.unconsumed_bytes(), middle - last.start);

    appender.write(&data[middle..]).unwrap();
    assert_eq!(reader.read_record_owned().unwrap(), Some(records[3].clone()));
    assert_eq!(reader.read_record().unwrap(), None);
    assert_eq!(reader.accumulated_skipped_bytes(), 0);
    assert_eq!(reader.unconsumed_bytes(), 0);
}

#[test]
fn resume_across_file_handles() {
    let log = TempLog::new();
    let records: Vec<Vec<u8>> = vec![b"complete".to_vec(), b"the one cut short".to_vec()];
    let data = write_records(
        &records,
        WriterOptions::new()
            .compression(Compression::Lz4)
            .flush_threshold(1),
    );
    let spans = extent_spans(&data);
    let cut = spans[1].start + 5;

    let mut appender = log.appender();
    appender.write(&data[..cut]).unwrap();
    appender.flush().unwrap();

    let options = ReaderOptions::new().resume_incomplete_tail(true);
    let mut reader = LogReader::new(log.reader(), options).unwrap();
    assert_eq!(reader.read_record_owned().unwrap(), Some(records[0].clone()));
    assert_eq!(reader.read_record().unwrap(), None);
    assert_eq!(reader.unconsumed_bytes(), 5);

    appender.write(&data[cut..]).unwrap();
    appender.flush().unwrap();
    assert_eq!(reader.read_record_owned().unwrap(), Some(records[1].clone()));
    assert_eq!(reader.stats().skipped_bytes, 0);
}

#[test]
fn garbage_tail_in_resume_mode_is_not_counted() {
    let (records, data, _) = log_with_spans();
    let mut damaged = data.clone();
    // A partial magic looks like the start of an extent being written.
    damaged.extend_from_slice(&[0xD5, 0x7E]);

    let outcome = scan(&damaged, ReaderOptions::new().resume_incomplete_tail(true));
    assert_eq!(outcome.items, records);
    assert_eq!(outcome.stats.skipped_bytes, 0);
    assert_eq!(outcome.unconsumed, 2);

    let outcome = read_all(&damaged);
    assert_eq!(outcome.items, records);
    assert_eq!(outcome.stats.skipped_bytes, 2);
}

#[test]
fn stale_header_mid_stream_does_not_hold_later_extents() {
    let records: Vec<Vec<u8>> = vec![b"first".to_vec(), vec![7; 1000], b"third".to_vec()];
    let data = write_extents(&records);
    let spans = extent_spans(&data);
    let stale_header = data[spans[1].start..spans[1].start + 11].to_vec();
    let damaged = Corruption::Insert {
        offset: spans[1].end,
        bytes: stale_header,
    }
    .applied_to(&data);

    for resume in [false, true] {
        let outcome = scan(
            &damaged,
            ReaderOptions::new().resume_incomplete_tail(resume),
        );
        assert_eq!(outcome.items, records, "resume {resume}");
        assert_eq!(outcome.stats.skipped_bytes, 11, "resume {resume}");
        assert_eq!(outcome.unconsumed, 0, "resume {resume}");
    }
}

#[test]
fn stale_header_before_a_real_tail_still_holds_the_tail() {
    let records: Vec<Vec<u8>> = vec![b"first".to_vec(), vec![7; 1000], b"third".to_vec()];
    let mut data = write_extents(&records);
    let spans = extent_spans(&data);
    let stale_header = data[spans[1].start..spans[1].start + 11].to_vec();
    Corruption::Insert {
        offset: spans[1].end,
        bytes: stale_header,
    }
    .apply(&mut data);

    let tail = write_extents(&["fourth, still being written"]);
    let partial = tail.len() - 3;
    data.extend_from_slice(&tail[..partial]);

    let outcome = scan(&data, ReaderOptions::new().resume_incomplete_tail(true));
    assert_eq!(outcome.items, records);
    assert_eq!(outcome.stats.skipped_bytes, 11);
    assert_eq!(outcome.unconsumed, partial);
}
