//! # LedgerKV
//!
//! A persistent key-value store with:
//! - An append-only log as the only durable state
//! - An in-memory index from each key to its latest record's offset
//! - Recovery by replaying the log on startup
//! - A validating request service and a TCP transport
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 TCP Server / CLI (local mode)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Request Service                            │
//! │          (key validation, error translation)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Storage Engine                             │
//! │        (RwLock: exclusive set, shared get)                   │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐           ┌──────────────────┐
//!   │  Index (memory) │──offset──▶│  Log (append-only)│
//!   │  key → offset   │           │  CSV records      │
//!   └─────────────────┘           └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod engine;
pub mod logfile;
pub mod network;
pub mod protocol;
pub mod service;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, SyncMode};
pub use engine::StorageEngine;
pub use error::{CorruptRecord, EngineError, LedgerError, RequestError, Result};
pub use service::RequestService;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LedgerKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
