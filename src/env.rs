//! Append-only byte sinks the table builder writes into.

use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// An append-only destination for table bytes.
///
/// The table builder borrows its sink; creating, syncing after `finish` and
/// closing the sink remain the caller's job.
pub trait WritableFile {
    /// Append `data` to the end of the sink.
    fn append(&mut self, data: &[u8]) -> Result<()>;

    /// Push buffered bytes down to the operating system.
    fn flush(&mut self) -> Result<()>;

    /// Flush and make the bytes durable.
    fn sync(&mut self) -> Result<()>;
}

impl WritableFile for Vec<u8> {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A buffered file sink.
pub struct FileSink {
    /// Path to the table file
    path: PathBuf,
    /// Buffered writer for efficient I/O
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&path)?;
        log::debug!("Created table file {:?}", path);

        Ok(Self { path, writer: BufWriter::new(file) })
    }

    /// Get the path to the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WritableFile for FileSink {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}
