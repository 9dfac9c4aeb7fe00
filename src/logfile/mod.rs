//! Log File Module
//!
//! The append-only log is the store's only durable state.
//!
//! ## Responsibilities
//! - Encode/decode records (escaped CSV, one logical line each)
//! - Durable appends that report the record's starting offset
//! - Positioned reads for index lookups
//! - Forward scan to rebuild the index on startup
//!
//! ## File Format
//! ```text
//! offset 0  ┌──────────────────────────────┐
//!           │ a,1\n                        │
//! offset 4  ├──────────────────────────────┤
//!           │ b,"two\nlines"\n             │
//! offset 18 ├──────────────────────────────┤
//!           │ a,3\n                        │
//!           └──────────────────────────────┘
//! ```
//!
//! The log is never rewritten or truncated; an overwrite is just a later
//! record for the same key.

mod reader;
pub mod record;
mod recovery;
mod writer;

pub use reader::{LogIterator, LogReader};
pub use record::{decode, encode, LogRecord};
pub use recovery::{LogRecovery, RecoveryResult};
pub use writer::LogWriter;
