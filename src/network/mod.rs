//! Network Module
//!
//! TCP transport wrapping the request service.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - Commands routed through `RequestService`
//! - Blocking client with connect/read/write timeouts

mod client;
mod connection;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use server::{Server, ShutdownHandle};
