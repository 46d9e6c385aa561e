//! Configuration for kvfmt clients
//!
//! Centralized configuration with sensible defaults.

use serde::{Deserialize, Serialize};

/// Connection and behaviour settings for a [`Client`](crate::Client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Server host name or IP
    pub host: String,

    /// Server TCP port
    pub port: u16,

    /// Password sent with AUTH during the handshake (skipped when `None`)
    pub password: Option<String>,

    /// Logical database selected during the handshake (skipped when 0)
    pub db_index: u32,

    // -------------------------------------------------------------------------
    // Pool Configuration
    // -------------------------------------------------------------------------
    /// Number of connections opened by `Client::connect`.
    /// Every command is issued on the first one.
    pub pool_size: usize,

    // -------------------------------------------------------------------------
    // Timing Configuration
    // -------------------------------------------------------------------------
    /// TCP connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    /// Round trips slower than this are logged as slow (milliseconds)
    pub slow_command_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db_index: 0,
            pool_size: 1,
            connect_timeout_ms: 3000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            slow_command_ms: 100,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `host:port` string used to open connections
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the AUTH password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Set the database index selected on connect
    pub fn db_index(mut self, index: u32) -> Self {
        self.config.db_index = index;
        self
    }

    /// Set the number of pooled connections
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the slow-command logging threshold (in milliseconds)
    pub fn slow_command_ms(mut self, ms: u64) -> Self {
        self.config.slow_command_ms = ms;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
