//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:  key_len (4 bytes) + key
//! - SET:  key_len (4 bytes) + key + value
//! - PING: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Command, CommandType, Response, Status};
use crate::error::{LedgerError, Result};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Bytes {
    let mut payload = BytesMut::new();
    match command {
        Command::Get { key } => {
            payload.put_u32(key.len() as u32);
            payload.put_slice(key.as_bytes());
        }
        Command::Set { key, value } => {
            payload.reserve(4 + key.len() + value.len());
            payload.put_u32(key.len() as u32);
            payload.put_slice(key.as_bytes());
            payload.put_slice(value.as_bytes());
        }
        Command::Ping => {}
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from a complete frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, mut payload) = split_frame(bytes, "command")?;

    match cmd_type {
        t if t == CommandType::Get as u8 => {
            let key = take_key(&mut payload, "GET")?;
            if payload.has_remaining() {
                return Err(LedgerError::Protocol(format!(
                    "GET command: {} unexpected trailing bytes",
                    payload.remaining()
                )));
            }
            Ok(Command::Get { key })
        }
        t if t == CommandType::Set as u8 => {
            let key = take_key(&mut payload, "SET")?;
            let value = utf8(payload, "SET value")?;
            Ok(Command::Set { key, value })
        }
        t if t == CommandType::Ping as u8 => {
            if !payload.is_empty() {
                return Err(LedgerError::Protocol(format!(
                    "PING command: unexpected payload of {} bytes",
                    payload.len()
                )));
            }
            Ok(Command::Ping)
        }
        _ => Err(LedgerError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Read `key_len (4) + key` off the front of a payload
fn take_key(payload: &mut &[u8], command: &str) -> Result<String> {
    if payload.remaining() < 4 {
        return Err(LedgerError::Protocol(format!(
            "{} command: missing key length",
            command
        )));
    }

    let key_len = payload.get_u32() as usize;
    if payload.remaining() < key_len {
        return Err(LedgerError::Protocol(format!(
            "{} command: incomplete key (expected {}, got {})",
            command,
            key_len,
            payload.remaining()
        )));
    }

    let key = utf8(&payload[..key_len], &format!("{} key", command))?;
    payload.advance(key_len);
    Ok(key)
}

fn utf8(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| LedgerError::Protocol(format!("{} is not valid UTF-8: {}", what, e)))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Bytes {
    let payload = response.payload.as_deref().unwrap_or("");
    frame(response.status as u8, payload.as_bytes())
}

/// Decode a response from a complete frame
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = Status::from_byte(status_byte).ok_or_else(|| {
        LedgerError::Protocol(format!("Unknown response status: 0x{:02x}", status_byte))
    })?;

    // An empty GET value and a missing payload look the same on the wire;
    // only NOT_FOUND decodes an empty payload as None.
    let payload = if status == Status::NotFound && payload.is_empty() {
        None
    } else {
        Some(utf8(payload, "response payload")?)
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Bytes {
    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.freeze()
}

/// Validate the header and return (tag, payload)
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(LedgerError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let tag = header.get_u8();
    let payload_len = checked_payload_len(header.get_u32())?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(LedgerError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

fn checked_payload_len(len: u32) -> Result<usize> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(LedgerError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

fn checked_outgoing_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE as usize {
        return Err(LedgerError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one whole frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len =
        checked_payload_len(u32::from_be_bytes([header[1], header[2], header[3], header[4]]))?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader)?;
    decode_command(&message)
}

/// Write a command to a stream
///
/// A command whose payload exceeds [`MAX_PAYLOAD_SIZE`] is rejected before
/// anything is written, so the stream stays usable.
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let message = encode_command(command);
    checked_outgoing_len(message.len() - HEADER_SIZE)?;
    writer.write_all(&message)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader)?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}
