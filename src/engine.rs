//! Engine Module
//!
//! The storage engine: an append-only log plus an in-memory index mapping
//! each key to the offset of its latest record.
//!
//! ## Responsibilities
//! - Rebuild the index from the log on startup (`initialize`)
//! - Serve point lookups with one seek + one record read
//! - Append writes durably, then publish them in the index

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::config::{Config, SyncMode};
use crate::error::EngineError;
use crate::logfile::{LogReader, LogRecord, LogRecovery, LogWriter, RecoveryResult};

/// The main storage engine
///
/// ## Concurrency Model
///
/// All mutable state lives behind one `RwLock`:
///
/// - **Writes** (`set`, `initialize`): exclusive lock for the whole call,
///   so appends are serialized and no index update is lost
/// - **Reads** (`get`): shared lock for lookup + record read, so a reader
///   never sees an index entry whose append has not been synced
///
/// Records are immutable once written, which is what makes concurrent
/// readers safe.
pub struct StorageEngine {
    /// Append-only log backing the store
    log_path: PathBuf,

    /// Durability call issued after each append
    sync_mode: SyncMode,

    state: RwLock<EngineState>,
}

struct EngineState {
    /// key → offset of the key's most recent record
    index: HashMap<String, u64>,

    /// Present once `initialize` has succeeded
    writer: Option<LogWriter>,

    last_recovery: Option<RecoveryResult>,
}

impl StorageEngine {
    /// Create an engine over `log_path`
    ///
    /// Nothing is touched on disk until [`initialize`](Self::initialize).
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self::with_sync_mode(log_path, SyncMode::All)
    }

    /// Create an engine with an explicit sync mode
    pub fn with_sync_mode(log_path: impl Into<PathBuf>, sync_mode: SyncMode) -> Self {
        Self {
            log_path: log_path.into(),
            sync_mode,
            state: RwLock::new(EngineState {
                index: HashMap::new(),
                writer: None,
                last_recovery: None,
            }),
        }
    }

    /// Create and initialize an engine from config
    pub fn open(config: &Config) -> Result<Self, EngineError> {
        let engine = Self::with_sync_mode(config.log_path.clone(), config.sync_mode);
        engine.initialize()?;
        Ok(engine)
    }

    /// Rebuild the index from the log and mark the engine ready
    ///
    /// A missing log is created empty. A record that fails to decode aborts
    /// recovery and the engine stays unusable. Must be called exactly once.
    pub fn initialize(&self) -> Result<(), EngineError> {
        let mut state = self.state.write();
        if state.writer.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }

        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let writer = LogWriter::open(&self.log_path, self.sync_mode)?;
        let (index, result) = LogRecovery::recover(&self.log_path).map_err(|e| {
            tracing::error!("Recovery of {} failed: {}", self.log_path.display(), e);
            e
        })?;

        tracing::info!(
            "Recovered {}: {} records scanned, {} keys indexed, {} bytes",
            self.log_path.display(),
            result.records_scanned,
            result.keys_indexed,
            result.bytes_scanned
        );

        state.index = index;
        state.writer = Some(writer);
        state.last_recovery = Some(result);
        Ok(())
    }

    /// Get the latest value written for `key`
    pub fn get(&self, key: &str) -> Result<String, EngineError> {
        let state = self.state.read();
        if state.writer.is_none() {
            return Err(EngineError::NotInitialized);
        }

        let offset = *state.index.get(key).ok_or(EngineError::KeyNotFound)?;

        let mut reader = LogReader::open(&self.log_path)?;
        let record = reader.read_at(offset)?;

        if record.key != key {
            tracing::error!(
                "Index points at offset {} for key {:?} but record holds key {:?}",
                offset,
                key,
                record.key
            );
            return Err(EngineError::Inconsistent {
                offset,
                expected: key.to_string(),
                found: record.key,
            });
        }

        Ok(record.value)
    }

    /// Append `key = value` to the log, then point the index at it
    ///
    /// The index changes only after the append has been synced; on error
    /// it is left untouched.
    pub fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let writer = state.writer.as_mut().ok_or(EngineError::NotInitialized)?;

        let offset = writer.append(&LogRecord::new(key, value))?;
        state.index.insert(key.to_string(), offset);

        tracing::trace!("Appended {:?} at offset {}", key, offset);
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Whether `initialize` has completed
    pub fn is_ready(&self) -> bool {
        self.state.read().writer.is_some()
    }

    /// Number of distinct keys in the index
    pub fn len(&self) -> usize {
        self.state.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state.read().index.contains_key(key)
    }

    /// Path of the backing log
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Current size of the log in bytes
    pub fn log_size(&self) -> Result<u64, EngineError> {
        Ok(fs::metadata(&self.log_path)?.len())
    }

    /// Stats from the recovery scan, once initialized
    pub fn last_recovery(&self) -> Option<RecoveryResult> {
        self.state.read().last_recovery.clone()
    }
}
