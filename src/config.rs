//! Configuration for LedgerKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{LedgerError, Result};

/// Main configuration for a LedgerKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the append-only log backing the store.
    /// Created (with its parent directories) on first access.
    pub log_path: PathBuf,

    /// How appends are made durable before the index is updated
    pub sync_mode: SyncMode,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

/// Durability call issued after every append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// `File::sync_all`: data and metadata
    All,

    /// `File::sync_data`: data plus the metadata needed to read it back
    Data,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./ledgerkv_data/database.csv"),
            sync_mode: SyncMode::All,
            listen_addr: "127.0.0.1:50051".to_string(),
            worker_threads: 4,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(LedgerError::Config("log path is empty".to_string()));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(LedgerError::Config("listen address is empty".to_string()));
        }
        if self.worker_threads == 0 {
            return Err(LedgerError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = path.into();
        self
    }

    /// Set the sync mode used after each append
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.config.sync_mode = mode;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
