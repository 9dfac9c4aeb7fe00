//! Error types for LedgerKV
//!
//! Each layer has its own error type so callers are forced to tell a
//! missing key apart from a broken store:
//!
//! - [`CorruptRecord`]: a byte range could not be decoded as a record
//! - [`EngineError`]: outcomes of the storage engine
//! - [`RequestError`]: the small taxonomy the request service exposes
//! - [`LedgerError`]: transport, configuration and binary-level failures

use thiserror::Error;

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;

/// A record in the log could not be parsed into exactly two fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("corrupt record: {reason}")]
pub struct CorruptRecord {
    pub reason: String,
}

impl CorruptRecord {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the storage engine
#[derive(Debug, Error)]
pub enum EngineError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("log corrupt at offset {offset}: {source}")]
    Corrupt {
        offset: u64,
        #[source]
        source: CorruptRecord,
    },

    /// The index pointed at a record for a different key
    #[error("index/log divergence at offset {offset}: expected key {expected:?}, found {found:?}")]
    Inconsistent {
        offset: u64,
        expected: String,
        found: String,
    },

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Lifecycle (caller contract violations)
    // -------------------------------------------------------------------------
    #[error("engine already initialized")]
    AlreadyInitialized,

    #[error("engine used before initialization")]
    NotInitialized,
}

/// Errors surfaced by the request service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Key cannot be empty")]
    InvalidKey,

    #[error("Key was not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Crate-level error for transport, configuration and binaries
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The server could not be reached at all
    #[error("store unreachable at {addr}: {reason}")]
    Unreachable { addr: String, reason: String },
}
