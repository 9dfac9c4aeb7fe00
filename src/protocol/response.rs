//! Response definitions
//!
//! Represents responses to clients.

use crate::error::RequestError;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    InvalidKey = 0x02,
    Internal = 0x03,
}

impl Status {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::NotFound),
            0x02 => Some(Status::InvalidKey),
            0x03 => Some(Status::Internal),
            _ => None,
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Value for GET, `PONG` for PING, message for errors
    pub payload: Option<String>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<String>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an INVALID_KEY response
    pub fn invalid_key(message: &str) -> Self {
        Self {
            status: Status::InvalidKey,
            payload: Some(message.to_string()),
        }
    }

    /// Create an INTERNAL response
    pub fn internal(message: &str) -> Self {
        Self {
            status: Status::Internal,
            payload: Some(message.to_string()),
        }
    }

    /// Map a request error onto its wire status
    pub fn from_error(error: &RequestError) -> Self {
        match error {
            RequestError::InvalidKey => Self::invalid_key(&error.to_string()),
            RequestError::NotFound => Self::not_found(),
            RequestError::Internal(_) => Self::internal(&error.to_string()),
        }
    }

    /// Turn a received response back into the service outcome
    ///
    /// Internal details are not re-wrapped; the message is kept as sent.
    pub fn into_result(self) -> Result<Option<String>, RequestError> {
        match self.status {
            Status::Ok => Ok(self.payload),
            Status::NotFound => Err(RequestError::NotFound),
            Status::InvalidKey => Err(RequestError::InvalidKey),
            Status::Internal => Err(RequestError::Internal(self.payload.unwrap_or_default())),
        }
    }
}
