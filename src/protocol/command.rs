//! Command definitions
//!
//! Represents requests from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Set = 0x02,
    Ping = 0x03,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get the latest value for a key
    Get { key: String },

    /// Append a key-value pair
    Set { key: String, value: String },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Ping => CommandType::Ping,
        }
    }
}
