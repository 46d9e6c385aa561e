//! TCP Connection
//!
//! Blocking connection to a store server.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::Transport;
use crate::cmd;
use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::{KvError, Result};
use crate::protocol::{read_reply, write_command, Reply};

/// A single blocking connection speaking RESP
pub struct TcpConnection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Set once a send or receive fails; the stream may hold a partial reply
    broken: bool,
}

impl TcpConnection {
    /// Connect, apply timeouts and run the AUTH / SELECT handshake
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = config.addr();
        let stream = open_stream(&addr, config.connect_timeout_ms)?;

        let mut connection = Self::from_stream(stream)?;
        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
        connection.handshake(config)?;

        tracing::debug!("Connected to {}", connection.peer_addr);
        Ok(connection)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            broken: false,
        })
    }

    /// Configure connection timeouts (0 leaves a timeout unset)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// True after a failed round trip; every later command is refused
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    fn round_trip(&mut self, command: &Command) -> Result<Reply> {
        write_command(&mut self.writer, command)?;
        read_reply(&mut self.reader)
    }

    fn handshake(&mut self, config: &ClientConfig) -> Result<()> {
        if let Some(password) = &config.password {
            self.expect_ok(&cmd!("AUTH", password))?;
        }
        if config.db_index != 0 {
            self.expect_ok(&cmd!("SELECT", config.db_index))?;
        }
        Ok(())
    }

    fn expect_ok(&mut self, command: &Command) -> Result<()> {
        match self.execute(command)? {
            Reply::Error(text) => Err(KvError::Transport(format!(
                "{} rejected by {}: {}",
                command.name(),
                self.peer_addr,
                text
            ))),
            _ => Ok(()),
        }
    }
}

impl Transport for TcpConnection {
    fn execute(&mut self, command: &Command) -> Result<Reply> {
        if self.broken {
            return Err(KvError::Transport("connection is broken".to_string()));
        }

        tracing::trace!("Sending to {}: {}", self.peer_addr, command.name());
        let result = self.round_trip(command);
        if let Err(e) = &result {
            tracing::warn!("Connection to {} is broken: {}", self.peer_addr, e);
            self.broken = true;
        }
        result
    }

    fn peer(&self) -> &str {
        &self.peer_addr
    }
}

fn open_stream(addr: &str, connect_timeout_ms: u64) -> Result<TcpStream> {
    let candidates: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();
    let mut last_error = None;

    for candidate in candidates {
        let attempt = if connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&candidate, Duration::from_millis(connect_timeout_ms))
        } else {
            TcpStream::connect(candidate)
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_error = Some(e);
            }
        }
    }

    Err(KvError::Transport(match last_error {
        Some(e) => format!("cannot connect to {}: {}", addr, e),
        None => format!("{} did not resolve to any address", addr),
    }))
}
