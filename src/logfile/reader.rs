//! Log Reader
//!
//! Sequential and positioned record reads from the log file.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::{CorruptRecord, EngineError};

use super::record::{self, LogRecord, Scan, TERMINATOR};

/// Reads records from the log file
pub struct LogReader {
    reader: BufReader<File>,

    /// Byte offset of the next record
    position: u64,

    /// Scratch buffer reused between records
    buf: Vec<u8>,
}

impl LogReader {
    /// Open the log for reading, positioned at offset 0
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
            buf: Vec::new(),
        })
    }

    /// Move to the record starting at `offset`
    pub fn seek(&mut self, offset: u64) -> Result<(), EngineError> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    /// Byte offset of the next record
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next record and the offset it starts at
    ///
    /// Empty lines between records are skipped. Returns `Ok(None)` at a
    /// clean end of file.
    pub fn next_record(&mut self) -> Result<Option<(u64, LogRecord)>, EngineError> {
        loop {
            self.buf.clear();
            let n = self.reader.read_until(TERMINATOR, &mut self.buf)?;
            if n == 0 {
                return Ok(None);
            }
            if !is_blank_line(&self.buf) {
                break;
            }
            self.position += n as u64;
        }

        let offset = self.position;
        let mut at_eof = self.buf.last() != Some(&TERMINATOR);

        let (len, record) = loop {
            match record::scan(&self.buf, at_eof) {
                Scan::Complete { fields, consumed } => {
                    let record = record::into_record(fields)
                        .map_err(|source| EngineError::Corrupt { offset, source })?;
                    break (consumed, record);
                }
                Scan::NeedMore if at_eof => {
                    return Err(EngineError::Corrupt {
                        offset,
                        source: CorruptRecord::new("unterminated quoted field"),
                    })
                }
                Scan::NeedMore => {
                    let n = self.reader.read_until(TERMINATOR, &mut self.buf)?;
                    at_eof = n == 0 || self.buf.last() != Some(&TERMINATOR);
                }
                Scan::Corrupt(source) => return Err(EngineError::Corrupt { offset, source }),
            }
        };

        debug_assert_eq!(len, self.buf.len());
        self.position += self.buf.len() as u64;
        Ok(Some((offset, record)))
    }

    /// Read the single record stored at `offset`
    pub fn read_at(&mut self, offset: u64) -> Result<LogRecord, EngineError> {
        self.seek(offset)?;
        match self.next_record()? {
            Some((_, record)) => Ok(record),
            None => Err(EngineError::Corrupt {
                offset,
                source: CorruptRecord::new("no record at offset (end of file)"),
            }),
        }
    }

    /// Iterate over all remaining records
    pub fn records(self) -> LogIterator {
        LogIterator {
            reader: self,
            failed: false,
        }
    }
}

/// Iterator over `(offset, record)` pairs
///
/// Stops after the first error.
pub struct LogIterator {
    reader: LogReader,
    failed: bool,
}

impl Iterator for LogIterator {
    type Item = Result<(u64, LogRecord), EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.reader.next_record() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// A line holding nothing but its terminator
fn is_blank_line(line: &[u8]) -> bool {
    matches!(line, b"\n" | b"\r\n" | b"\r")
}
