//! # kvfmt
//!
//! A typed command/reply layer for RESP key-value stores:
//! - Typed arguments formatted into reusable command templates
//! - Modifier options (`EX`, `PX`, `NX`, ...) with name-only or name+value forms
//! - Compile-time selected conversions from tagged replies to Rust types
//! - Recursive decoding of pairs, sequences, maps and structured records
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Client (facade)                          │
//! │          one typed method per store command                  │
//! └──────────┬───────────────────────────────────▲──────────────┘
//!            │ Command                           │ Decoded<T>
//!            ▼                                   │
//!   ┌─────────────────┐                 ┌────────┴────────┐
//!   │ Command         │                 │ Reply Decoder   │
//!   │ Formatter       │                 │ + Conversion    │
//!   │ (templates)     │                 │   Registry      │
//!   └────────┬────────┘                 └────────▲────────┘
//!            │                                   │ Reply
//!            ▼                                   │
//!   ┌─────────────────────────────────────────────┴──────────┐
//!   │          Transport (ConnectionPool → index 0)           │
//!   └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvfmt::{Client, ClientConfig};
//!
//! let config = ClientConfig::builder().host("127.0.0.1").port(6379).build();
//! let mut client = Client::connect(&config)?;
//! let _ = client.hset("user:1", &[("name", "ada"), ("level", "3")]);
//! let name: kvfmt::Decoded<String> = client.hget("user:1", "name");
//! # Ok::<(), kvfmt::KvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod command;
pub mod decode;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DecodeError, Decoded, KvError, Result};
pub use config::ClientConfig;
pub use protocol::{Reply, ReplyTag};
pub use command::{format, Command, CommandArg};
pub use decode::{decode, FromArrayReply, FromReply, FromScalarReply, Record};
pub use network::{ConnectionPool, TcpConnection, Transport};
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvfmt
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
