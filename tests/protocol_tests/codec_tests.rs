//! Codec Tests
//!
//! Tests for RESP command encoding and reply decoding.

use std::io::Cursor;

use kvfmt::cmd;
use kvfmt::command::{Nx, Px};
use kvfmt::protocol::{
    decode_reply, encode_command, encode_reply, read_reply, write_command, Reply,
    MAX_LINE_LENGTH,
};
use kvfmt::KvError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_simple_command() {
    let encoded = encode_command(&cmd!("SET", "k", "v"));
    assert_eq!(encoded, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n".to_vec());
}

#[test]
fn test_encode_keeps_argument_with_spaces_whole() {
    let encoded = encode_command(&cmd!("HSET", "test", "space1 test1", "v"));
    assert_eq!(
        encoded,
        b"*4\r\n$4\r\nHSET\r\n$4\r\ntest\r\n$12\r\nspace1 test1\r\n$1\r\nv\r\n".to_vec()
    );
}

#[test]
fn test_encode_modifiers_as_separate_tokens() {
    let encoded = encode_command(&cmd!("SET", "lock", 1, Px(3000), Nx));
    assert_eq!(
        encoded,
        b"*6\r\n$3\r\nSET\r\n$4\r\nlock\r\n$1\r\n1\r\n$2\r\nPX\r\n$4\r\n3000\r\n$2\r\nNX\r\n"
            .to_vec()
    );
}

#[test]
fn test_write_command_to_stream() {
    let mut out = Vec::new();
    write_command(&mut out, &cmd!("PING")).unwrap();
    assert_eq!(out, b"*1\r\n$4\r\nPING\r\n".to_vec());
}

// =============================================================================
// RESP2 Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_status() {
    assert_eq!(decode_reply(b"+OK\r\n").unwrap(), Reply::status("OK"));
}

#[test]
fn test_decode_error() {
    assert_eq!(
        decode_reply(b"-ERR unknown command\r\n").unwrap(),
        Reply::error("ERR unknown command")
    );
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode_reply(b":42\r\n").unwrap(), Reply::Integer(42));
    assert_eq!(decode_reply(b":-2\r\n").unwrap(), Reply::Integer(-2));
}

#[test]
fn test_decode_bulk_string() {
    assert_eq!(decode_reply(b"$5\r\nhello\r\n").unwrap(), Reply::bulk("hello"));
    assert_eq!(decode_reply(b"$0\r\n\r\n").unwrap(), Reply::bulk(""));
}

#[test]
fn test_decode_binary_bulk_string() {
    let reply = decode_reply(b"$4\r\n\x00\r\n\xff\r\n").unwrap();
    assert_eq!(reply, Reply::bulk(vec![0x00, b'\r', b'\n', 0xff]));
}

#[test]
fn test_decode_null_forms() {
    assert_eq!(decode_reply(b"$-1\r\n").unwrap(), Reply::Nil);
    assert_eq!(decode_reply(b"*-1\r\n").unwrap(), Reply::Nil);
    assert_eq!(decode_reply(b"_\r\n").unwrap(), Reply::Nil);
}

#[test]
fn test_decode_array() {
    let reply = decode_reply(b"*3\r\n$1\r\na\r\n:1\r\n$-1\r\n").unwrap();
    assert_eq!(
        reply,
        Reply::Array(vec![Reply::bulk("a"), Reply::Integer(1), Reply::Nil])
    );
}

#[test]
fn test_decode_nested_array() {
    let reply = decode_reply(b"*2\r\n$1\r\n0\r\n*2\r\n$1\r\na\r\n$1\r\nb\r\n").unwrap();
    assert_eq!(
        reply,
        Reply::Array(vec![
            Reply::bulk("0"),
            Reply::Array(vec![Reply::bulk("a"), Reply::bulk("b")]),
        ])
    );
}

// =============================================================================
// RESP3 Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_double_boolean_bignumber() {
    assert_eq!(decode_reply(b",3.14\r\n").unwrap(), Reply::Double("3.14".into()));
    assert_eq!(decode_reply(b"#t\r\n").unwrap(), Reply::Boolean(true));
    assert_eq!(decode_reply(b"#f\r\n").unwrap(), Reply::Boolean(false));
    assert_eq!(
        decode_reply(b"(3492890328409238509324850943850943825024385\r\n").unwrap(),
        Reply::BigNumber("3492890328409238509324850943850943825024385".into())
    );
}

#[test]
fn test_decode_verbatim_strips_format() {
    assert_eq!(
        decode_reply(b"=15\r\ntxt:Some string\r\n").unwrap(),
        Reply::VerbatimString("Some string".into())
    );
}

#[test]
fn test_decode_bulk_error() {
    assert_eq!(
        decode_reply(b"!8\r\nERR oops\r\n").unwrap(),
        Reply::error("ERR oops")
    );
}

#[test]
fn test_decode_map_is_flattened() {
    let reply = decode_reply(b"%2\r\n+a\r\n:1\r\n+b\r\n:2\r\n").unwrap();
    assert_eq!(
        reply,
        Reply::Map(vec![
            Reply::status("a"),
            Reply::Integer(1),
            Reply::status("b"),
            Reply::Integer(2),
        ])
    );
}

#[test]
fn test_decode_set_and_push() {
    assert_eq!(
        decode_reply(b"~2\r\n:1\r\n:2\r\n").unwrap(),
        Reply::Set(vec![Reply::Integer(1), Reply::Integer(2)])
    );
    assert_eq!(
        decode_reply(b">2\r\n+message\r\n+hi\r\n").unwrap(),
        Reply::Push(vec![Reply::status("message"), Reply::status("hi")])
    );
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_unknown_type_byte() {
    assert!(matches!(decode_reply(b"?x\r\n"), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_missing_crlf() {
    assert!(matches!(decode_reply(b"+OK"), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_truncated_bulk() {
    assert!(matches!(decode_reply(b"$5\r\nhel"), Err(KvError::Io(_))));
}

#[test]
fn test_decode_empty_input() {
    assert!(matches!(decode_reply(b""), Err(KvError::Io(_))));
}

#[test]
fn test_decode_invalid_integer() {
    assert!(matches!(decode_reply(b":abc\r\n"), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_rejects_deep_nesting() {
    let mut bytes = Vec::new();
    for _ in 0..40 {
        bytes.extend_from_slice(b"*1\r\n");
    }
    bytes.extend_from_slice(b":1\r\n");
    assert!(matches!(decode_reply(&bytes), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_rejects_unterminated_long_line() {
    let mut bytes = b"+".to_vec();
    bytes.extend(std::iter::repeat(b'a').take(MAX_LINE_LENGTH + 16));
    assert!(matches!(decode_reply(&bytes), Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_accepts_line_at_limit() {
    let mut bytes = b"+".to_vec();
    bytes.extend(std::iter::repeat(b'a').take(MAX_LINE_LENGTH - 1));
    bytes.extend_from_slice(b"\r\n");
    let reply = decode_reply(&bytes).unwrap();
    assert_eq!(reply.as_text().map(|text| text.len()), Some(MAX_LINE_LENGTH - 1));
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_read_consecutive_replies() {
    let mut cursor = Cursor::new(b"+OK\r\n:7\r\n$-1\r\n".to_vec());
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::status("OK"));
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Integer(7));
    assert_eq!(read_reply(&mut cursor).unwrap(), Reply::Nil);
    assert!(read_reply(&mut cursor).is_err());
}

#[test]
fn test_encoded_reply_reads_back() {
    let reply = Reply::Array(vec![
        Reply::bulk("member"),
        Reply::Double("1.5".into()),
        Reply::Map(vec![Reply::bulk("k"), Reply::Boolean(true)]),
        Reply::VerbatimString("note".into()),
        Reply::Nil,
        Reply::error("ERR inner"),
    ]);
    assert_eq!(decode_reply(&encode_reply(&reply)).unwrap(), reply);
}

#[test]
fn test_request_decodes_as_array_of_bulk_strings() {
    let encoded = encode_command(&cmd!("GET", "key"));
    assert_eq!(
        decode_reply(&encoded).unwrap(),
        Reply::Array(vec![Reply::bulk("GET"), Reply::bulk("key")])
    );
}
