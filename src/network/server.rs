//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver};

use super::Connection;
use crate::config::Config;
use crate::error::Result;
use crate::service::RequestService;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for LedgerKV
///
/// One acceptor thread (the caller of [`run`](Self::run)) hands accepted
/// streams to a fixed pool of workers over a channel. Each worker serves
/// one connection at a time until the client goes away.
pub struct Server {
    config: Config,
    service: RequestService,
    listener: Option<TcpListener>,
    shutdown: Arc<AtomicBool>,
}

/// Cloneable handle that stops a running server
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and return from `run`
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Server {
    /// Create a new server with the given config and service
    pub fn new(config: Config, service: RequestService) -> Self {
        Self {
            config,
            service,
            listener: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the listen address without starting to serve
    ///
    /// Useful with port 0 to learn the chosen port before `run`.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        let listener = Self::open_listener(&self.config.listen_addr)?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    fn open_listener(addr: &str) -> Result<TcpListener> {
        let listener = TcpListener::bind(addr)?;
        // Polled so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;
        Ok(listener)
    }

    /// Address the server is bound to, if bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Get a handle that can stop the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Start the server (blocking)
    ///
    /// Returns once shutdown has been requested and every worker has
    /// finished its current connection.
    pub fn run(&mut self) -> Result<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => Self::open_listener(&self.config.listen_addr)?,
        };

        tracing::info!(
            "Listening on {} with {} workers",
            listener.local_addr()?,
            self.config.worker_threads
        );

        let (tx, rx) = unbounded::<TcpStream>();
        let mut workers = Vec::with_capacity(self.config.worker_threads);
        for id in 0..self.config.worker_threads {
            workers.push(self.spawn_worker(id, rx.clone())?);
        }
        drop(rx);

        while !self.shutdown.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, addr)) => {
                    tracing::debug!("Accepted connection from {}", addr);
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                        continue;
                    }
                    if tx.send(stream).is_err() {
                        tracing::error!("All workers exited; stopping acceptor");
                        break;
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let service = self.service.clone();
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let handle = thread::Builder::new()
            .name(format!("ledgerkv-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    let mut connection = match Connection::new(stream, service.clone()) {
                        Ok(connection) => connection,
                        Err(e) => {
                            tracing::warn!("Failed to set up connection: {}", e);
                            continue;
                        }
                    };

                    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
                        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
                        continue;
                    }

                    if let Err(e) = connection.handle() {
                        tracing::warn!("Connection {} ended with error: {}", connection.peer_addr(), e);
                    }
                }
            })?;

        Ok(handle)
    }
}
