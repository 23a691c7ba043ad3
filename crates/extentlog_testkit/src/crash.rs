//! Crash simulation for extent logs.
//!
//! [`CrashableStream`] wraps a stream and fails writes once a byte budget is
//! spent, optionally leaving a partial write behind, the way a process
//! killed mid-`write` would. It also counts flushes so tests can check
//! durability calls.
//!
//! ## Usage
//!
//! ```rust
//! use extentlog_core::{LogWriter, WriterOptions};
//! use extentlog_storage::MemoryStream;
//! use extentlog_testkit::crash::CrashableStream;
//!
//! let inner = MemoryStream::new();
//! let observer = inner.share();
//! let stream = CrashableStream::new(inner);
//! stream.crash_after(20);
//!
//! let mut writer = LogWriter::new(stream, WriterOptions::new().flush_threshold(1)).unwrap();
//! writer.write_record(b"fits").unwrap();
//! assert!(writer.write_record(b"crosses the budget").is_err());
//! assert_eq!(observer.len(), 20);
//! ```

use extentlog_storage::{ByteStream, StreamError, StreamResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A stream wrapper that can simulate crashes.
pub struct CrashableStream<S: ByteStream> {
    inner: S,
    crash_after_bytes: AtomicUsize,
    bytes_written: AtomicUsize,
    crashed: AtomicBool,
    fail_on_flush: AtomicBool,
    writes: AtomicUsize,
    flushes: AtomicUsize,
}

impl<S: ByteStream> CrashableStream<S> {
    /// Wraps `inner`; nothing fails until configured.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            crash_after_bytes: AtomicUsize::new(usize::MAX),
            bytes_written: AtomicUsize::new(0),
            crashed: AtomicBool::new(false),
            fail_on_flush: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            flushes: AtomicUsize::new(0),
        }
    }

    /// Fails every write once `bytes` have been written in total.
    ///
    /// The write that crosses the budget writes its prefix up to the budget
    /// before failing.
    pub fn crash_after(&self, bytes: usize) {
        self.crash_after_bytes.store(bytes, Ordering::SeqCst);
    }

    /// Sets whether flush should fail.
    pub fn set_fail_on_flush(&self, fail: bool) {
        self.fail_on_flush.store(fail, Ordering::SeqCst);
    }

    /// Resets the crash state and counters.
    pub fn reset(&self) {
        self.crash_after_bytes.store(usize::MAX, Ordering::SeqCst);
        self.bytes_written.store(0, Ordering::SeqCst);
        self.crashed.store(false, Ordering::SeqCst);
        self.fail_on_flush.store(false, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
        self.flushes.store(0, Ordering::SeqCst);
    }

    /// Returns whether a simulated crash has happened.
    pub fn has_crashed(&self) -> bool {
        self.crashed.load(Ordering::SeqCst)
    }

    /// Returns the bytes passed to the inner stream.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written.load(Ordering::SeqCst)
    }

    /// Returns the number of write calls, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the number of successful flushes.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Returns the wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwraps the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn crash(&self, what: &str) -> StreamError {
        self.crashed.store(true, Ordering::SeqCst);
        StreamError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("simulated crash during {what}"),
        ))
    }
}

impl<S: ByteStream> ByteStream for CrashableStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        self.inner.read(buf)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let current = self.bytes_written.load(Ordering::SeqCst);
        let threshold = self.crash_after_bytes.load(Ordering::SeqCst);

        if current >= threshold {
            return Err(self.crash("write"));
        }

        if current + data.len() > threshold {
            let partial = threshold - current;
            if partial > 0 {
                self.inner.write(&data[..partial])?;
                self.bytes_written.fetch_add(partial, Ordering::SeqCst);
            }
            return Err(self.crash("partial write"));
        }

        self.inner.write(data)?;
        self.bytes_written.fetch_add(data.len(), Ordering::SeqCst);
        Ok(())
    }

    fn tell(&self) -> StreamResult<u64> {
        self.inner.tell()
    }

    fn seek(&mut self, offset: u64) -> StreamResult<()> {
        self.inner.seek(offset)
    }

    fn flush(&mut self) -> StreamResult<()> {
        if self.fail_on_flush.load(Ordering::SeqCst) {
            return Err(self.crash("flush"));
        }
        self.inner.flush()?;
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extentlog_storage::MemoryStream;

    #[test]
    fn partial_write_then_crash() {
        let inner = MemoryStream::new();
        let observer = inner.share();
        let mut stream = CrashableStream::new(inner);
        stream.crash_after(6);

        stream.write(b"abcd").unwrap();
        assert!(stream.write(b"efgh").is_err());
        assert!(stream.has_crashed());
        assert_eq!(observer.data(), b"abcdef");
        assert!(stream.write(b"ij").is_err());
        assert_eq!(stream.write_count(), 3);
    }

    #[test]
    fn failing_flush() {
        let mut stream = CrashableStream::new(MemoryStream::new());
        stream.flush().unwrap();
        stream.set_fail_on_flush(true);
        assert!(stream.flush().is_err());
        assert_eq!(stream.flush_count(), 1);

        stream.reset();
        assert!(!stream.has_crashed());
        stream.flush().unwrap();
        assert_eq!(stream.flush_count(), 1);
    }
}
