//! Connection Pool
//!
//! Ordered set of transports. Every command goes to the first entry; the
//! remaining connections are opened but idle.

use super::{TcpConnection, Transport};
use crate::config::ClientConfig;
use crate::error::{KvError, Result};

/// Non-empty ordered collection of transports
pub struct ConnectionPool<T> {
    connections: Vec<T>,
}

impl<T: Transport> ConnectionPool<T> {
    /// Create a pool; fails when `connections` is empty
    pub fn new(connections: Vec<T>) -> Result<Self> {
        if connections.is_empty() {
            return Err(KvError::Config(
                "connection pool needs at least one connection".to_string(),
            ));
        }
        Ok(Self { connections })
    }

    /// Pool holding exactly one transport
    pub fn single(connection: T) -> Self {
        Self {
            connections: vec![connection],
        }
    }

    /// The connection every command is issued on (index 0)
    pub fn primary(&mut self) -> &mut T {
        &mut self.connections[0]
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.connections.iter()
    }
}

impl ConnectionPool<TcpConnection> {
    /// Open `config.pool_size` connections (at least one)
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let size = config.pool_size.max(1);
        let connections = (0..size)
            .map(|_| TcpConnection::connect(config))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Opened {} connection(s) to {}", size, config.addr());
        Self::new(connections)
    }
}
