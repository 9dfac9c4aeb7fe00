//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{self, BufReader, BufWriter, ErrorKind, Read};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::error::{LedgerError, Result};
use crate::protocol::{read_command, write_response, Response, MAX_PAYLOAD_SIZE};
use crate::service::RequestService;

/// Most bytes discarded after a protocol error before the socket is closed
const DRAIN_LIMIT: u64 = MAX_PAYLOAD_SIZE as u64;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Service every command is routed through
    service: RequestService,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, service: RequestService) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            service,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction unbounded)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends responses.
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(LedgerError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} went away ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(LedgerError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    // Windows reports TimedOut, Unix WouldBlock
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    if self.send_response(Response::internal(&e.to_string())).is_ok() {
                        self.drain();
                    }
                    return Err(e);
                }
            };

            tracing::debug!("Received command from {}: {:?}", self.peer_addr, command);

            let response = self.service.execute(command);

            if let Err(e) = self.send_response(response) {
                if let LedgerError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)
    }

    /// Close our side and discard whatever the client is still sending
    ///
    /// Closing with unread input makes the kernel reset the connection,
    /// which can destroy the error reply before the client reads it.
    fn drain(&mut self) {
        let _ = self.writer.get_ref().shutdown(Shutdown::Write);
        let mut unread = (&mut self.reader).take(DRAIN_LIMIT);
        match io::copy(&mut unread, &mut io::sink()) {
            Ok(n) => tracing::debug!("Discarded {} bytes from {}", n, self.peer_addr),
            Err(e) => tracing::debug!("Stopped draining {}: {}", self.peer_addr, e),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
