//! Tests for the TCP server and client
//!
//! These tests verify:
//! - End-to-end get/set over TCP
//! - Error statuses reach the client intact
//! - Multiple concurrent clients
//! - Unreachable servers are reported distinctly
//! - Oversized frames fail cleanly on both ends
//! - Graceful shutdown

use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ledgerkv::network::{Client, Server, ShutdownHandle};
use ledgerkv::protocol::{read_response, CommandType, Status, MAX_PAYLOAD_SIZE};
use ledgerkv::{Config, LedgerError, RequestError, RequestService, StorageEngine};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const TIMEOUT: Duration = Duration::from_secs(5);

struct TestServer {
    _temp: TempDir,
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: JoinHandle<()>,
}

impl TestServer {
    fn start() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::builder()
            .log_path(temp_dir.path().join("database.csv"))
            .listen_addr("127.0.0.1:0")
            .worker_threads(4)
            .read_timeout_ms(2000)
            .write_timeout_ms(2000)
            .build();

        let engine = Arc::new(StorageEngine::open(&config).unwrap());
        let mut server = Server::new(config, RequestService::new(engine));
        let addr = server.bind().unwrap();
        let shutdown = server.shutdown_handle();
        let thread = thread::spawn(move || server.run().unwrap());

        Self {
            _temp: temp_dir,
            addr,
            shutdown,
            thread,
        }
    }

    fn client(&self) -> Client {
        Client::connect(&self.addr.to_string(), TIMEOUT).unwrap()
    }

    fn stop(self) {
        self.shutdown.shutdown();
        self.thread.join().unwrap();
    }
}

// =============================================================================
// End-to-end Tests
// =============================================================================

#[test]
fn test_set_get_over_tcp() {
    let server = TestServer::start();
    {
        let mut client = server.client();
        client.ping().unwrap();

        client.set("a", "1").unwrap();
        client.set("b", "2").unwrap();
        client.set("a", "3").unwrap();

        assert_eq!(client.get("a").unwrap(), "3");
        assert_eq!(client.get("b").unwrap(), "2");
    }
    server.stop();
}

#[test]
fn test_error_statuses_over_tcp() {
    let server = TestServer::start();
    {
        let mut client = server.client();

        assert!(matches!(
            client.get("missing"),
            Err(LedgerError::Request(RequestError::NotFound))
        ));
        assert!(matches!(
            client.get("   "),
            Err(LedgerError::Request(RequestError::InvalidKey))
        ));
        assert!(matches!(
            client.set("", "x"),
            Err(LedgerError::Request(RequestError::InvalidKey))
        ));

        // Connection stays usable after errors
        client.set("k", "").unwrap();
        assert_eq!(client.get("k").unwrap(), "");
    }
    server.stop();
}

#[test]
fn test_values_with_newlines_over_tcp() {
    let server = TestServer::start();
    {
        let mut client = server.client();
        let value = "line1\nline2,\"quoted\"";

        client.set("multi", value).unwrap();

        assert_eq!(server.client().get("multi").unwrap(), value);
    }
    server.stop();
}

#[test]
fn test_concurrent_clients() {
    let server = TestServer::start();
    let addr = server.addr.to_string();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let addr = addr.clone();
            thread::spawn(move || {
                let mut client = Client::connect(&addr, TIMEOUT).unwrap();
                for i in 0..25 {
                    let key = format!("client{}-{}", t, i);
                    client.set(&key, &i.to_string()).unwrap();
                    assert_eq!(client.get(&key).unwrap(), i.to_string());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    {
        let mut client = server.client();
        assert_eq!(client.get("client3-24").unwrap(), "24");
    }
    server.stop();
}

// =============================================================================
// Transport Failure Tests
// =============================================================================

#[test]
fn test_unreachable_server() {
    // Grab a free port, then release it so nothing is listening there
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let result = Client::connect(&addr.to_string(), Duration::from_millis(500));

    assert!(matches!(result, Err(LedgerError::Unreachable { .. })));
}

#[test]
fn test_unresolvable_address() {
    let result = Client::connect("not an address", Duration::from_millis(500));

    assert!(matches!(result, Err(LedgerError::Unreachable { .. })));
}

#[test]
fn test_oversized_set_is_rejected_before_sending() {
    let server = TestServer::start();
    {
        let mut client = server.client();
        let value = "x".repeat(MAX_PAYLOAD_SIZE as usize);

        assert!(matches!(
            client.set("big", &value),
            Err(LedgerError::Protocol(_))
        ));

        // Nothing reached the wire, so the connection is still in sync
        client.ping().unwrap();
        assert!(matches!(
            client.get("big"),
            Err(LedgerError::Request(RequestError::NotFound))
        ));
    }
    server.stop();
}

#[test]
fn test_oversized_frame_gets_error_reply() {
    let server = TestServer::start();
    {
        let mut stream = TcpStream::connect(server.addr).unwrap();
        stream.set_read_timeout(Some(TIMEOUT)).unwrap();

        let mut frame = vec![CommandType::Set as u8];
        frame.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());
        frame.extend_from_slice(&vec![b'x'; 256 * 1024]);
        stream.write_all(&frame).unwrap();

        let response = read_response(&mut stream).unwrap();
        assert_eq!(response.status, Status::Internal);
    }
    server.stop();
}

#[test]
fn test_shutdown_returns_from_run() {
    let server = TestServer::start();
    assert!(!server.shutdown.is_shutdown());

    server.stop();
}
