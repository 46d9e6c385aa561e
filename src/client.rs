//! Command Facade
//!
//! One typed method per store command. Every method:
//! 1. renders its arguments and binds them to a shared template
//! 2. sends the command on the pool's first connection
//! 3. decodes the reply into the method's declared result type
//!
//! Transport failures are logged and returned as [`DecodeError::Failed`];
//! nothing is retried.

use std::time::{Duration, Instant};

use crate::command::{Command, CommandArg, CommandBuilder, Count, Match, Nx, Px, WithScores};
use crate::config::ClientConfig;
use crate::decode::{decode, FromArrayReply, FromReply, FromScalarReply};
use crate::error::{DecodeError, Decoded, Result};
use crate::network::{ConnectionPool, TcpConnection, Transport};

/// Default slow-command threshold
pub const DEFAULT_SLOW_COMMAND: Duration = Duration::from_millis(100);

/// Default expiry of a lock taken with [`Client::try_lock`] (milliseconds)
pub const DEFAULT_LOCK_TTL_MS: i64 = 3000;

/// Typed client over a pool of transports
pub struct Client<T: Transport = TcpConnection> {
    pool: ConnectionPool<T>,
    slow_threshold: Duration,
}

impl Client<TcpConnection> {
    /// Open the configured pool of TCP connections
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let pool = ConnectionPool::connect(config)?;
        Ok(Self::new(pool).with_slow_threshold(Duration::from_millis(config.slow_command_ms)))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(pool: ConnectionPool<T>) -> Self {
        Self {
            pool,
            slow_threshold: DEFAULT_SLOW_COMMAND,
        }
    }

    /// Client over a single transport
    pub fn with_transport(transport: T) -> Self {
        Self::new(ConnectionPool::single(transport))
    }

    /// Round trips slower than `threshold` are logged as slow
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    pub fn pool(&self) -> &ConnectionPool<T> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ConnectionPool<T> {
        &mut self.pool
    }

    // =========================================================================
    // Generic Execution
    // =========================================================================

    /// Send any command and decode its reply as `R`
    pub fn execute<R: FromReply>(&mut self, command: &Command) -> Decoded<R> {
        let connection = self.pool.primary();

        let start = Instant::now();
        let result = connection.execute(command);
        let elapsed = start.elapsed();
        if elapsed > self.slow_threshold {
            tracing::warn!(
                "slow command: time[{}ms] command[{}]",
                elapsed.as_millis(),
                command
            );
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    "cmd[{}] got no reply from {}: {}",
                    command,
                    connection.peer(),
                    e
                );
                return Err(DecodeError::Failed);
            }
        };

        tracing::trace!("cmd[{}] -> {} reply", command.name(), reply.tag());
        let decoded = decode::<R>(&reply);
        if let Err(DecodeError::Server(_)) = &decoded {
            tracing::error!("command[{}] rejected by server", command);
        }
        decoded
    }

    // =========================================================================
    // Connection
    // =========================================================================

    pub fn auth(&mut self, password: &str) -> Decoded<String> {
        self.execute(&crate::cmd!("AUTH", password))
    }

    pub fn select(&mut self, index: u32) -> Decoded<String> {
        self.execute(&crate::cmd!("SELECT", index))
    }

    pub fn ping(&mut self) -> Decoded<String> {
        self.execute(&crate::cmd!("PING"))
    }

    // =========================================================================
    // Strings & Keys
    // =========================================================================

    /// GET; a missing key is [`DecodeError::Nil`]
    pub fn get<V: FromScalarReply>(&mut self, key: &str) -> Decoded<V> {
        self.execute(&crate::cmd!("GET", key))
    }

    /// SET with optional modifiers such as `&Px(3000)` or `&Nx`
    ///
    /// A conditional set that did not happen replies nil.
    pub fn set<V: CommandArg + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
        modifiers: &[&dyn CommandArg],
    ) -> Decoded<String> {
        let command = CommandBuilder::new("SET")
            .arg(key)
            .arg(value)
            .args(modifiers)
            .build();
        self.execute(&command)
    }

    /// Integer reply: 1 if the key was set, 0 otherwise
    pub fn setnx<V: CommandArg + ?Sized>(&mut self, key: &str, value: &V) -> Decoded<i64> {
        self.execute(&crate::cmd!("SETNX", key, value))
    }

    /// Integer reply: the value after the increment
    pub fn incrby(&mut self, key: &str, increment: i64) -> Decoded<i64> {
        self.execute(&crate::cmd!("INCRBY", key, increment))
    }

    /// Integer reply: number of keys removed
    pub fn del<K: CommandArg>(&mut self, keys: &[K]) -> Decoded<i64> {
        require_args("DEL", keys.len())?;
        self.execute(&CommandBuilder::new("DEL").args(keys).build())
    }

    /// Integer reply: 1 if the key exists, 0 otherwise
    pub fn exists(&mut self, key: &str) -> Decoded<i64> {
        self.execute(&crate::cmd!("EXISTS", key))
    }

    /// Integer reply: 1 if the timeout was set, 0 otherwise
    pub fn expire(&mut self, key: &str, seconds: i64) -> Decoded<i64> {
        self.execute(&crate::cmd!("EXPIRE", key, seconds))
    }

    /// Integer reply: TTL in seconds, -1 without expiry, -2 for a missing key
    pub fn ttl(&mut self, key: &str) -> Decoded<i64> {
        self.execute(&crate::cmd!("TTL", key))
    }

    // =========================================================================
    // Hashes
    // =========================================================================

    pub fn hget<V: FromScalarReply, F: CommandArg + ?Sized>(
        &mut self,
        key: &str,
        field: &F,
    ) -> Decoded<V> {
        self.execute(&crate::cmd!("HGET", key, field))
    }

    /// Values in request order; missing fields come back as `"(nil)"`
    pub fn hmget<F: CommandArg>(&mut self, key: &str, fields: &[F]) -> Decoded<Vec<String>> {
        require_args("HMGET", fields.len())?;
        self.execute(&CommandBuilder::new("HMGET").arg(key).args(fields).build())
    }

    /// All fields and values, as a map, pair list or [`Record`](crate::decode::Record)
    pub fn hgetall<V: FromArrayReply>(&mut self, key: &str) -> Decoded<V> {
        self.execute(&crate::cmd!("HGETALL", key))
    }

    /// Integer reply: number of fields added
    pub fn hset<F: CommandArg, V: CommandArg>(
        &mut self,
        key: &str,
        pairs: &[(F, V)],
    ) -> Decoded<i64> {
        require_args("HSET", pairs.len())?;
        self.execute(&CommandBuilder::new("HSET").arg(key).args(pairs).build())
    }

    /// HSET from any container of field/value pairs
    pub fn hset_map<I, F, V>(&mut self, key: &str, entries: I) -> Decoded<i64>
    where
        I: IntoIterator<Item = (F, V)>,
        F: CommandArg,
        V: CommandArg,
    {
        let mut builder = CommandBuilder::new("HSET").arg(key);
        let mut count = 0;
        for (field, value) in entries {
            builder = builder.arg(&field).arg(&value);
            count += 1;
        }
        require_args("HSET", count)?;
        self.execute(&builder.build())
    }

    /// Integer reply: the field value after the increment
    pub fn hincrby<F: CommandArg + ?Sized>(
        &mut self,
        key: &str,
        field: &F,
        increment: i64,
    ) -> Decoded<i64> {
        self.execute(&crate::cmd!("HINCRBY", key, field, increment))
    }

    /// Integer reply: number of fields removed
    pub fn hdel<F: CommandArg>(&mut self, key: &str, fields: &[F]) -> Decoded<i64> {
        require_args("HDEL", fields.len())?;
        self.execute(&CommandBuilder::new("HDEL").arg(key).args(fields).build())
    }

    /// Integer reply: 1 if the hash contains the field, 0 otherwise
    pub fn hexists<F: CommandArg + ?Sized>(&mut self, key: &str, field: &F) -> Decoded<i64> {
        self.execute(&crate::cmd!("HEXISTS", key, field))
    }

    // =========================================================================
    // Sets
    // =========================================================================

    /// Integer reply: number of members added
    pub fn sadd<M: CommandArg>(&mut self, key: &str, members: &[M]) -> Decoded<i64> {
        require_args("SADD", members.len())?;
        self.execute(&CommandBuilder::new("SADD").arg(key).args(members).build())
    }

    /// Integer reply: number of members removed
    pub fn srem<M: CommandArg>(&mut self, key: &str, members: &[M]) -> Decoded<i64> {
        require_args("SREM", members.len())?;
        self.execute(&CommandBuilder::new("SREM").arg(key).args(members).build())
    }

    pub fn sismember<M: CommandArg + ?Sized>(&mut self, key: &str, member: &M) -> Decoded<i64> {
        self.execute(&crate::cmd!("SISMEMBER", key, member))
    }

    pub fn smembers<V: FromArrayReply>(&mut self, key: &str) -> Decoded<V> {
        self.execute(&crate::cmd!("SMEMBERS", key))
    }

    /// One SSCAN step: `(next cursor, members)`
    ///
    /// An empty `pattern` and a zero `count` are left out of the command.
    pub fn sscan(
        &mut self,
        key: &str,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Decoded<(u64, Vec<String>)> {
        let mut builder = CommandBuilder::new("SSCAN").arg(key).arg(&cursor);
        if !pattern.is_empty() {
            builder = builder.arg(&Match(pattern.to_string()));
        }
        if count > 0 {
            builder = builder.arg(&Count(count));
        }
        self.execute(&builder.build())
    }

    // =========================================================================
    // Sorted Sets
    // =========================================================================

    /// Add `(score, member)` entries; integer reply: number added
    pub fn zadd<S: CommandArg, M: CommandArg>(
        &mut self,
        key: &str,
        entries: &[(S, M)],
    ) -> Decoded<i64> {
        require_args("ZADD", entries.len())?;
        self.execute(&CommandBuilder::new("ZADD").arg(key).args(entries).build())
    }

    /// Integer reply: number of members removed
    pub fn zrem<M: CommandArg>(&mut self, key: &str, members: &[M]) -> Decoded<i64> {
        require_args("ZREM", members.len())?;
        self.execute(&CommandBuilder::new("ZREM").arg(key).args(members).build())
    }

    pub fn zcard(&mut self, key: &str) -> Decoded<i64> {
        self.execute(&crate::cmd!("ZCARD", key))
    }

    /// Score of `member`; nil when the member is absent
    pub fn zscore<M: CommandArg + ?Sized>(&mut self, key: &str, member: &M) -> Decoded<f64> {
        self.execute(&crate::cmd!("ZSCORE", key, member))
    }

    /// New score of `member` after the increment
    pub fn zincrby<M: CommandArg + ?Sized>(
        &mut self,
        key: &str,
        increment: f64,
        member: &M,
    ) -> Decoded<f64> {
        self.execute(&crate::cmd!("ZINCRBY", key, increment, member))
    }

    /// Members from highest to lowest score, with their scores
    pub fn zrevrange(&mut self, key: &str, start: i64, stop: i64) -> Decoded<Vec<(String, f64)>> {
        self.execute(&crate::cmd!("ZREVRANGE", key, start, stop, WithScores))
    }

    /// Rank counted from the highest score; nil when the member is absent
    pub fn zrevrank<M: CommandArg + ?Sized>(&mut self, key: &str, member: &M) -> Decoded<i64> {
        self.execute(&crate::cmd!("ZREVRANK", key, member))
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Best-effort lock: `SET key 1 PX ttl_ms NX`
    ///
    /// Ok(`"OK"`) when acquired, `Err(Nil)` when someone else holds it. There
    /// is no owner token and no reentrancy.
    pub fn try_lock(&mut self, key: &str, ttl_ms: i64) -> Decoded<String> {
        self.set(key, &1, &[&Px(ttl_ms), &Nx])
    }

    /// Release a lock by deleting its key, whoever holds it
    pub fn unlock(&mut self, key: &str) -> Decoded<i64> {
        self.del(&[key])
    }
}

/// Variadic commands need at least one argument
fn require_args(command: &str, count: usize) -> Decoded<()> {
    if count == 0 {
        tracing::error!("{}: invalid number of arguments", command);
        return Err(DecodeError::Failed);
    }
    Ok(())
}
