//! File-based byte stream for persistent logs.

use crate::error::{StreamError, StreamResult};
use crate::stream::ByteStream;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file-based byte stream.
///
/// # Modes
///
/// - [`FileStream::create`] truncates or creates the file for appending
/// - [`FileStream::open_append`] keeps existing bytes and appends after them
/// - [`FileStream::open_read`] opens an existing file read-only with the
///   cursor at offset 0
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `close()` additionally calls `File::sync_all()` on writable files
///
/// # Example
///
/// ```no_run
/// use extentlog_storage::{ByteStream, FileStream};
/// use std::path::Path;
///
/// let mut stream = FileStream::create(Path::new("events.log")).unwrap();
/// stream.write(b"persistent data").unwrap();
/// stream.close().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStream {
    path: PathBuf,
    file: Option<File>,
    position: u64,
    writable: bool,
}

impl FileStream {
    /// Creates (or truncates) a file for appending.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> StreamResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            position: 0,
            writable: true,
        })
    }

    /// Opens or creates a file, keeping its contents, and positions the
    /// stream at its end.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open_append(path: &Path) -> StreamResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;
        let position = file.seek(SeekFrom::End(0))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            position,
            writable: true,
        })
    }

    /// Opens an existing file read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open_read(path: &Path) -> StreamResult<Self> {
        let file = File::open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            position: 0,
            writable: false,
        })
    }

    /// Creates a file for appending, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be opened.
    pub fn create_with_dirs(path: &Path) -> StreamResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::create(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current size of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is closed or metadata is unavailable.
    pub fn size(&self) -> StreamResult<u64> {
        Ok(self.file()?.metadata()?.len())
    }

    fn file(&self) -> StreamResult<&File> {
        self.file.as_ref().ok_or(StreamError::Closed)
    }

    fn file_mut(&mut self) -> StreamResult<&mut File> {
        self.file.as_mut().ok_or(StreamError::Closed)
    }
}

impl ByteStream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        let position = self.position;
        let file = self.file_mut()?;
        // Appends move the OS cursor, so always read from our own position.
        file.seek(SeekFrom::Start(position))?;
        let n = file.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        if !self.writable {
            return Err(StreamError::ReadOnly);
        }
        if data.is_empty() {
            return Ok(());
        }
        let file = self.file_mut()?;
        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        let end = file.stream_position()?;
        self.position = end;
        Ok(())
    }

    fn tell(&self) -> StreamResult<u64> {
        self.file()?;
        Ok(self.position)
    }

    fn seek(&mut self, offset: u64) -> StreamResult<()> {
        let size = self.size()?;
        if offset > size {
            return Err(StreamError::SeekPastEnd { offset, size });
        }
        self.position = offset;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        let file = self.file_mut()?;
        file.flush()?;
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        if let Some(mut file) = self.file.take() {
            if self.writable {
                file.flush()?;
                file.sync_all()?;
            }
            debug!(path = %self.path.display(), "closed file stream");
        }
        Ok(())
    }
}
