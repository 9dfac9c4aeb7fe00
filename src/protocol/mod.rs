//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: GET   - Payload: key_len (4) + key
//! - 0x02: SET   - Payload: key_len (4) + key + value
//! - 0x03: PING  - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: INVALID_KEY
//! - 0x03: INTERNAL
//!
//! All integers are big-endian; keys, values and messages are UTF-8.

mod codec;
mod command;
mod response;

pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use command::{Command, CommandType};
pub use response::{Response, Status};
