//! TCP Client
//!
//! Blocking client for the LedgerKV wire protocol.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{LedgerError, Result};
use crate::protocol::{read_response, write_command, Command, Response};

/// A connection to a LedgerKV server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    addr: String,
}

impl Client {
    /// Connect to `addr`, giving up after `timeout`
    ///
    /// The same timeout bounds every later read and write. Failure to
    /// resolve or connect is reported as [`LedgerError::Unreachable`].
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let unreachable = |reason: String| LedgerError::Unreachable {
            addr: addr.to_string(),
            reason,
        };

        let candidates = addr
            .to_socket_addrs()
            .map_err(|e| unreachable(e.to_string()))?;

        let mut last_error = "address resolved to nothing".to_string();
        let mut stream = None;
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_error = e.to_string(),
            }
        }
        let stream = stream.ok_or_else(|| unreachable(last_error))?;

        stream.set_nodelay(true)?;
        if !timeout.is_zero() {
            stream.set_read_timeout(Some(timeout))?;
            stream.set_write_timeout(Some(timeout))?;
        }

        tracing::debug!("Connected to {}", addr);

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
            addr: addr.to_string(),
        })
    }

    /// Get the latest value for `key`
    pub fn get(&mut self, key: &str) -> Result<String> {
        let value = self
            .call(Command::Get {
                key: key.to_string(),
            })?
            .into_result()?;
        Ok(value.unwrap_or_default())
    }

    /// Store `value` under `key`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.call(Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        })?
        .into_result()?;
        Ok(())
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        match self.call(Command::Ping)?.into_result()? {
            Some(ref reply) if reply == "PONG" => Ok(()),
            other => Err(LedgerError::Protocol(format!(
                "unexpected PING reply: {:?}",
                other
            ))),
        }
    }

    /// Server address this client talks to
    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn call(&mut self, command: Command) -> Result<Response> {
        write_command(&mut self.writer, &command)?;
        read_response(&mut self.reader)
    }
}
