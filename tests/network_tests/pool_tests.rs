//! Pool Tests
//!
//! Tests for connection pool construction and routing.

use kvfmt::{Client, ConnectionPool, KvError, Reply, Transport};

#[path = "../common/mod.rs"]
mod common;

use common::ScriptedTransport;

#[test]
fn test_empty_pool_rejected() {
    let result = ConnectionPool::<ScriptedTransport>::new(Vec::new());
    assert!(matches!(result, Err(KvError::Config(_))));
}

#[test]
fn test_single_pool() {
    let pool = ConnectionPool::single(ScriptedTransport::new());
    assert_eq!(pool.len(), 1);
    assert!(!pool.is_empty());
}

#[test]
fn test_commands_use_first_connection_only() {
    let transports: Vec<ScriptedTransport> = (0..3)
        .map(|_| {
            let mut transport = ScriptedTransport::new();
            transport.push_reply(Reply::status("PONG"));
            transport.push_reply(Reply::status("PONG"));
            transport
        })
        .collect();
    let pool = ConnectionPool::new(transports).unwrap();
    let mut client = Client::new(pool);

    assert_eq!(client.ping(), Ok("PONG".to_string()));
    assert_eq!(client.ping(), Ok("PONG".to_string()));

    let counts: Vec<usize> = client.pool().iter().map(|t| t.sent.len()).collect();
    assert_eq!(counts, vec![2, 0, 0]);
}

#[test]
fn test_boxed_transport() {
    let mut transport = ScriptedTransport::new();
    transport.push_reply(Reply::Integer(1));
    let boxed: Box<dyn Transport> = Box::new(transport);
    assert_eq!(boxed.peer(), "scripted");

    let mut client = Client::with_transport(boxed);
    assert_eq!(client.exists("k"), Ok(1));
}
