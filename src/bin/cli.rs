//! LedgerKV CLI Client
//!
//! Command-line interface for LedgerKV. Talks to a server by default, or
//! works on a log file directly with `--database`.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ledgerkv::network::Client;
use ledgerkv::{LedgerError, RequestError, RequestService, StorageEngine};
use tracing_subscriber::{fmt, EnvFilter};

/// LedgerKV CLI
#[derive(Parser, Debug)]
#[command(name = "ledgerkv-cli")]
#[command(about = "CLI for LedgerKV key-value store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:50051", conflicts_with = "database")]
    server: String,

    /// Operate on this log file directly instead of a server
    #[arg(short, long)]
    database: Option<String>,

    /// Connect/read/write timeout in milliseconds
    #[arg(short, long, default_value = "10000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the latest value set for a key
    Get {
        /// The key to get
        key: String,
    },

    /// Set the value of a key
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Ping the server
    Ping,
}

/// Backend a command runs against
enum Target {
    Remote(Client),
    Local(RequestService),
}

impl Target {
    fn get(&mut self, key: &str) -> ledgerkv::Result<String> {
        match self {
            Target::Remote(client) => client.get(key),
            Target::Local(service) => Ok(service.handle_get(key)?),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ledgerkv::Result<()> {
        match self {
            Target::Remote(client) => client.set(key, value),
            Target::Local(service) => Ok(service.handle_set(key, value)?),
        }
    }

    fn ping(&mut self) -> ledgerkv::Result<()> {
        match self {
            Target::Remote(client) => client.ping(),
            Target::Local(_) => Ok(()),
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    match run(args) {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: Args) -> ledgerkv::Result<Option<String>> {
    let mut target = match args.database {
        Some(path) => {
            let engine = StorageEngine::new(path);
            engine.initialize()?;
            Target::Local(RequestService::new(Arc::new(engine)))
        }
        None => Target::Remote(Client::connect(
            &args.server,
            Duration::from_millis(args.timeout_ms),
        )?),
    };

    match args.command {
        Commands::Get { key } => target.get(&key).map(Some),
        Commands::Set { key, value } => target.set(&key, &value).map(|()| None),
        Commands::Ping => target.ping().map(|()| Some("PONG".to_string())),
    }
}

/// 0 ok, 1 internal, 2 not found, 3 invalid key, 4 unreachable
fn exit_code(error: &LedgerError) -> u8 {
    match error {
        LedgerError::Request(RequestError::NotFound) => 2,
        LedgerError::Request(RequestError::InvalidKey) => 3,
        LedgerError::Unreachable { .. } => 4,
        _ => 1,
    }
}
