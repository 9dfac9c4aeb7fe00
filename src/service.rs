//! Request Service
//!
//! Validation and error translation between a transport and the engine.
//!
//! The service holds no state of its own beyond a shared engine handle, so
//! it can be cloned freely into every connection worker.

use std::sync::Arc;

use crate::engine::StorageEngine;
use crate::error::{EngineError, RequestError};
use crate::protocol::{Command, Response};

/// The unit a transport calls into
#[derive(Clone)]
pub struct RequestService {
    engine: Arc<StorageEngine>,
}

impl RequestService {
    pub fn new(engine: Arc<StorageEngine>) -> Self {
        Self { engine }
    }

    /// Look up the latest value for `key`
    pub fn handle_get(&self, key: &str) -> Result<String, RequestError> {
        validate_key(key)?;

        self.engine.get(key).map_err(|e| match e {
            EngineError::KeyNotFound => RequestError::NotFound,
            other => internal(other),
        })
    }

    /// Store `value` under `key`; any value, including empty, is accepted
    pub fn handle_set(&self, key: &str, value: &str) -> Result<(), RequestError> {
        validate_key(key)?;

        self.engine.set(key, value).map_err(internal)
    }

    /// Run a decoded wire command and build the reply
    pub fn execute(&self, command: Command) -> Response {
        let result = match command {
            Command::Get { key } => self.handle_get(&key).map(Some),
            Command::Set { key, value } => self.handle_set(&key, &value).map(|()| None),
            Command::Ping => Ok(Some("PONG".to_string())),
        };

        match result {
            Ok(value) => Response::ok(value),
            Err(e) => Response::from_error(&e),
        }
    }

    pub fn engine(&self) -> &Arc<StorageEngine> {
        &self.engine
    }
}

/// Keys must contain something other than whitespace
pub fn validate_key(key: &str) -> Result<(), RequestError> {
    if key.trim().is_empty() {
        return Err(RequestError::InvalidKey);
    }
    Ok(())
}

fn internal(e: EngineError) -> RequestError {
    tracing::warn!("Engine failure: {}", e);
    RequestError::Internal(e.to_string())
}
