//! Log Writer
//!
//! Durable appends to the log file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncMode;
use crate::error::EngineError;

use super::record::{LogRecord, TERMINATOR};

/// Appends records to the log file
pub struct LogWriter {
    file: File,
    path: PathBuf,
    sync_mode: SyncMode,

    /// The last record on disk has no terminator (hand-edited file)
    tail_open: bool,
}

impl LogWriter {
    /// Open the log for appending, creating it if absent
    pub fn open(path: &Path, sync_mode: SyncMode) -> Result<Self, EngineError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let len = file.metadata()?.len();
        let tail_open = if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            last[0] != TERMINATOR
        } else {
            false
        };

        Ok(Self {
            file,
            path: path.to_path_buf(),
            sync_mode,
            tail_open,
        })
    }

    /// Append a record and make it durable
    ///
    /// Returns the offset the record starts at. Nothing is reported as
    /// written until the sync has returned.
    pub fn append(&mut self, record: &LogRecord) -> Result<u64, EngineError> {
        let mut offset = self.file.seek(SeekFrom::End(0))?;

        let encoded = record.encode();
        let mut bytes = Vec::with_capacity(encoded.len() + 1);
        if self.tail_open {
            bytes.push(TERMINATOR);
            offset += 1;
        }
        bytes.extend_from_slice(&encoded);

        if let Err(e) = self.write_durably(&bytes) {
            // Part of the record may have reached the file; start the next
            // one on a fresh line
            self.tail_open = true;
            return Err(e);
        }
        self.tail_open = false;

        Ok(offset)
    }

    fn write_durably(&mut self, bytes: &[u8]) -> Result<(), EngineError> {
        self.file.write_all(bytes)?;
        self.sync()
    }

    /// Force the log to disk according to the sync mode
    pub fn sync(&mut self) -> Result<(), EngineError> {
        self.file.flush()?;
        match self.sync_mode {
            SyncMode::All => self.file.sync_all()?,
            SyncMode::Data => self.file.sync_data()?,
        }
        Ok(())
    }

    /// Current size of the log in bytes
    pub fn len(&self) -> Result<u64, EngineError> {
        Ok(self.file.metadata()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
