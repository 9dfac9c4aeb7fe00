//! Log Recovery
//!
//! Rebuilds the key → offset index with one forward scan of the log.

use std::collections::HashMap;
use std::path::Path;

use crate::error::EngineError;

use super::LogReader;

/// Handles index recovery on startup
pub struct LogRecovery;

/// Summary of a recovery scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Records decoded, superseded ones included
    pub records_scanned: u64,

    /// Distinct keys in the rebuilt index
    pub keys_indexed: u64,

    /// Bytes consumed from the log
    pub bytes_scanned: u64,
}

impl LogRecovery {
    /// Scan the log and build the index
    ///
    /// Later records for a key replace earlier ones. The first record that
    /// fails to decode aborts the scan.
    pub fn recover(path: &Path) -> Result<(HashMap<String, u64>, RecoveryResult), EngineError> {
        let mut reader = LogReader::open(path)?;
        let mut index = HashMap::new();
        let mut records_scanned = 0u64;

        while let Some((offset, record)) = reader.next_record()? {
            index.insert(record.key, offset);
            records_scanned += 1;
        }

        let result = RecoveryResult {
            records_scanned,
            keys_indexed: index.len() as u64,
            bytes_scanned: reader.position(),
        };

        Ok((index, result))
    }
}
