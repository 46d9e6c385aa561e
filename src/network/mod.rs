//! Network Module
//!
//! Transport seam between the command facade and the wire.
//!
//! ## Architecture
//! - `Transport`: send one command, block for its reply
//! - `TcpConnection`: RESP over a blocking TCP stream
//! - `ConnectionPool`: ordered transports, commands always use the first

mod connection;
mod pool;

pub use connection::TcpConnection;
pub use pool::ConnectionPool;

use crate::command::Command;
use crate::error::Result;
use crate::protocol::Reply;

/// A blocking request/reply channel to the store
///
/// The returned reply is owned by the caller and released when dropped.
pub trait Transport {
    /// Send `command` and wait for its reply
    fn execute(&mut self, command: &Command) -> Result<Reply>;

    /// Peer description used in log lines
    fn peer(&self) -> &str {
        "unknown"
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&mut self, command: &Command) -> Result<Reply> {
        (**self).execute(command)
    }

    fn peer(&self) -> &str {
        (**self).peer()
    }
}
