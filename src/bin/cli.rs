//! kvfmt CLI Client
//!
//! Command-line interface for talking to a RESP key-value store.

use std::fmt::Display;

use clap::{Parser, Subcommand};
use kvfmt::command::{CommandBuilder, Ex, Nx, Px, Xx};
use kvfmt::{Client, ClientConfig, DecodeError, Decoded, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// kvfmt CLI
#[derive(Parser, Debug)]
#[command(name = "kvfmt-cli")]
#[command(about = "Typed CLI for RESP key-value stores")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 6379)]
    port: u16,

    /// Password sent with AUTH
    #[arg(short = 'a', long)]
    password: Option<String>,

    /// Database index selected after connecting
    #[arg(short = 'n', long, default_value_t = 0)]
    db: u32,

    /// Slow command threshold in milliseconds
    #[arg(long, default_value_t = 100)]
    slow_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Expire after this many seconds
        #[arg(long)]
        ex: Option<i64>,

        /// Expire after this many milliseconds
        #[arg(long)]
        px: Option<i64>,

        /// Only set if the key does not exist
        #[arg(long)]
        nx: bool,

        /// Only set if the key exists
        #[arg(long)]
        xx: bool,
    },

    /// Delete keys
    Del {
        /// Keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Check whether a key exists
    Exists {
        key: String,
    },

    /// Remaining time to live of a key
    Ttl {
        key: String,
    },

    /// Print all fields and values of a hash
    Hgetall {
        key: String,
    },

    /// Take a best-effort lock
    Lock {
        key: String,

        /// Lock expiry in milliseconds
        #[arg(long, default_value_t = kvfmt::client::DEFAULT_LOCK_TTL_MS)]
        ttl_ms: i64,
    },

    /// Release a lock (deletes the key)
    Unlock {
        key: String,
    },

    /// Ping the server
    Ping,

    /// Send an arbitrary command
    Raw {
        /// Command name followed by its arguments
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvfmt=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .db_index(args.db)
        .slow_command_ms(args.slow_ms);
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    let config = builder.build();

    let mut client = match Client::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", config.addr(), e);
            std::process::exit(1);
        }
    };

    let ok = match args.command {
        Commands::Get { key } => print_result(client.get::<String>(&key)),
        Commands::Set { key, value, ex, px, nx, xx } => {
            let (ex, px) = (ex.map(Ex), px.map(Px));
            let (nx, xx) = (nx.then_some(Nx), xx.then_some(Xx));
            print_result(client.set(&key, value.as_str(), &[&ex, &px, &nx, &xx]))
        }
        Commands::Del { keys } => print_result(client.del(keys.as_slice())),
        Commands::Exists { key } => print_result(client.exists(&key)),
        Commands::Ttl { key } => print_result(client.ttl(&key)),
        Commands::Hgetall { key } => match client.hgetall::<Vec<(String, String)>>(&key) {
            Ok(pairs) => {
                for (i, (field, value)) in pairs.iter().enumerate() {
                    println!("{}) {}", 2 * i + 1, field);
                    println!("{}) {}", 2 * i + 2, value);
                }
                true
            }
            Err(e) => print_result::<String>(Err(e)),
        },
        Commands::Lock { key, ttl_ms } => print_result(client.try_lock(&key, ttl_ms)),
        Commands::Unlock { key } => print_result(client.unlock(&key)),
        Commands::Ping => print_result(client.ping()),
        Commands::Raw { words } => {
            let command = CommandBuilder::new(&words[0]).args(&words[1..]).build();
            print_result(client.execute::<Reply>(&command))
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Print a decoded reply the way the store's own CLI would
fn print_result<T: Display>(result: Decoded<T>) -> bool {
    match result {
        Ok(value) => {
            println!("{}", value);
            true
        }
        Err(DecodeError::Nil) => {
            println!("(nil)");
            true
        }
        Err(DecodeError::Server(text)) => {
            println!("(error) {}", text);
            false
        }
        Err(DecodeError::Failed) => {
            eprintln!("command failed");
            false
        }
    }
}
