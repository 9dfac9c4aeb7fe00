//! LedgerKV Server Binary
//!
//! Opens the log, rebuilds the index, and serves it over TCP.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use ledgerkv::network::Server;
use ledgerkv::{Config, RequestService, StorageEngine, SyncMode};
use tracing_subscriber::{fmt, EnvFilter};

/// LedgerKV Server
#[derive(Parser, Debug)]
#[command(name = "ledgerkv-server")]
#[command(about = "Persistent key-value store over an append-only log")]
#[command(version)]
struct Args {
    /// Log file backing the store
    #[arg(short, long, default_value = "./ledgerkv_data/database.csv")]
    database: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Per-connection read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Durability call after each append
    #[arg(long, value_enum, default_value = "all")]
    sync: SyncArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncArg {
    /// fsync data and metadata
    All,
    /// fdatasync
    Data,
}

impl From<SyncArg> for SyncMode {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::All => SyncMode::All,
            SyncArg::Data => SyncMode::Data,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ledgerkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("LedgerKV Server v{}", ledgerkv::VERSION);
    tracing::info!("Database: {}", args.database);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .log_path(&args.database)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .sync_mode(args.sync.into())
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let engine = match StorageEngine::open(&config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized with {} keys", engine.len());

    let mut server = Server::new(config, RequestService::new(engine));
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
