//! Protocol codec
//!
//! Encoding of commands and decoding of replies for the store's RESP wire
//! protocol (RESP2 and the RESP3 extensions).
//!
//! ## Request Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg 0>\r\n
//! ...
//! $<len>\r\n<arg argc-1>\r\n
//! ```
//!
//! ## Reply Format
//! ```text
//! ┌──────────┬──────────────────────────┬──────────────────────────┐
//! │ Type (1) │ Line / length / count    │ \r\n  (+ body / children) │
//! └──────────┴──────────────────────────┴──────────────────────────┘
//! ```
//!
//! Type bytes: `+` status, `-` error, `:` integer, `$` bulk, `*` array,
//! `_` null, `,` double, `#` boolean, `(` big number, `!` bulk error,
//! `=` verbatim, `%` map, `~` set, `|` attribute, `>` push.

use std::io::{BufRead, Cursor, Read, Write};

use bytes::Bytes;

use super::Reply;
use crate::command::Command;
use crate::error::{KvError, Result};

/// Maximum nesting depth for composite replies
pub const MAX_NESTING_DEPTH: usize = 32;

/// Maximum bulk string size (512 MB)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum length of a status, error or header line (without CRLF)
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Maximum number of children in a single composite reply
pub const MAX_ELEMENTS: usize = 1_000_000;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command as a RESP array of bulk strings
pub fn encode_command(command: &Command) -> Vec<u8> {
    let argv = command.argv();
    let mut message = Vec::with_capacity(16 + argv.iter().map(|arg| arg.len() + 16).sum::<usize>());

    message.push(b'*');
    message.extend_from_slice(argv.len().to_string().as_bytes());
    message.extend_from_slice(CRLF);
    for arg in argv {
        push_bulk(&mut message, arg.as_bytes());
    }

    message
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Encoding
// =============================================================================

/// Encode a reply to its wire form
///
/// Nil is written in the RESP2 form (`$-1`) so both protocol versions can
/// read it back.
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    let mut message = Vec::new();
    encode_reply_into(reply, &mut message);
    message
}

fn encode_reply_into(reply: &Reply, out: &mut Vec<u8>) {
    match reply {
        Reply::String(data) => {
            out.push(b'$');
            push_bulk_body(out, data);
        }
        Reply::Integer(value) => push_line(out, b':', value.to_string().as_bytes()),
        Reply::Nil => out.extend_from_slice(b"$-1\r\n"),
        Reply::Status(text) => push_line(out, b'+', text.as_bytes()),
        Reply::Error(text) => push_line(out, b'-', text.as_bytes()),
        Reply::Double(text) => push_line(out, b',', text.as_bytes()),
        Reply::Boolean(value) => push_line(out, b'#', if *value { b"t" } else { b"f" }),
        Reply::BigNumber(text) => push_line(out, b'(', text.as_bytes()),
        Reply::VerbatimString(text) => {
            out.push(b'=');
            let mut body = Vec::with_capacity(text.len() + 4);
            body.extend_from_slice(b"txt:");
            body.extend_from_slice(text.as_bytes());
            push_bulk_body(out, &body);
        }
        Reply::Array(items) => push_children(out, b'*', items.len(), items),
        Reply::Set(items) => push_children(out, b'~', items.len(), items),
        Reply::Push(items) => push_children(out, b'>', items.len(), items),
        Reply::Map(items) => push_children(out, b'%', items.len() / 2, items),
        Reply::Attribute(items) => push_children(out, b'|', items.len() / 2, items),
    }
}

fn push_line(out: &mut Vec<u8>, prefix: u8, body: &[u8]) {
    out.push(prefix);
    out.extend_from_slice(body);
    out.extend_from_slice(CRLF);
}

fn push_bulk(out: &mut Vec<u8>, data: &[u8]) {
    out.push(b'$');
    push_bulk_body(out, data);
}

fn push_bulk_body(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(data.len().to_string().as_bytes());
    out.extend_from_slice(CRLF);
    out.extend_from_slice(data);
    out.extend_from_slice(CRLF);
}

fn push_children(out: &mut Vec<u8>, prefix: u8, count: usize, items: &[Reply]) {
    push_line(out, prefix, count.to_string().as_bytes());
    for item in items {
        encode_reply_into(item, out);
    }
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Decode a single complete reply from bytes
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let mut cursor = Cursor::new(bytes);
    read_reply(&mut cursor)
}

/// Read a complete reply from a stream
///
/// Blocks until the whole reply (including all children) is received or an
/// error occurs.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    read_value(reader, 0)
}

fn read_value<R: BufRead>(reader: &mut R, depth: usize) -> Result<Reply> {
    if depth > MAX_NESTING_DEPTH {
        return Err(KvError::Protocol("maximum nesting depth exceeded".to_string()));
    }

    let line = read_line(reader)?;
    let (&type_byte, body) = line
        .split_first()
        .ok_or_else(|| KvError::Protocol("empty reply line".to_string()))?;

    match type_byte {
        b'+' => Ok(Reply::Status(text(body))),
        b'-' => Ok(Reply::Error(text(body))),
        b':' => Ok(Reply::Integer(parse_integer(body)?)),
        b'$' => Ok(read_bulk(reader, body)?.map_or(Reply::Nil, Reply::String)),
        b'!' => Ok(read_bulk(reader, body)?
            .map_or(Reply::Nil, |data| Reply::Error(text(&data)))),
        b'=' => Ok(read_bulk(reader, body)?
            .map_or(Reply::Nil, |data| Reply::VerbatimString(strip_verbatim_format(&data)))),
        b'_' => Ok(Reply::Nil),
        b',' => Ok(Reply::Double(text(body))),
        b'(' => Ok(Reply::BigNumber(text(body))),
        b'#' => match body {
            b"t" => Ok(Reply::Boolean(true)),
            b"f" => Ok(Reply::Boolean(false)),
            _ => Err(KvError::Protocol(format!("invalid boolean: {}", text(body)))),
        },
        b'*' => Ok(read_children(reader, body, 1, depth)?.map_or(Reply::Nil, Reply::Array)),
        b'~' => Ok(read_children(reader, body, 1, depth)?.map_or(Reply::Nil, Reply::Set)),
        b'>' => Ok(read_children(reader, body, 1, depth)?.map_or(Reply::Nil, Reply::Push)),
        b'%' => Ok(read_children(reader, body, 2, depth)?.map_or(Reply::Nil, Reply::Map)),
        b'|' => Ok(read_children(reader, body, 2, depth)?.map_or(Reply::Nil, Reply::Attribute)),
        _ => Err(KvError::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            type_byte
        ))),
    }
}

/// Read one CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let limit = (MAX_LINE_LENGTH + CRLF.len()) as u64;
    let read = reader.by_ref().take(limit).read_until(b'\n', &mut line)?;
    if read == 0 {
        return Err(KvError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed while reading reply",
        )));
    }
    if !line.ends_with(b"\n") && line.len() as u64 == limit {
        return Err(KvError::Protocol(format!(
            "Reply line too long (max {} bytes)",
            MAX_LINE_LENGTH
        )));
    }
    if !line.ends_with(CRLF) {
        return Err(KvError::Protocol("reply line not terminated by CRLF".to_string()));
    }
    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

/// Read a length-prefixed body; `None` for the `-1` null form
fn read_bulk<R: BufRead>(reader: &mut R, len_field: &[u8]) -> Result<Option<Bytes>> {
    let len = parse_integer(len_field)?;
    if len < 0 {
        return Ok(None);
    }
    let len = len as usize;
    if len > MAX_BULK_SIZE {
        return Err(KvError::Protocol(format!(
            "Bulk string too large: {} bytes (max {})",
            len, MAX_BULK_SIZE
        )));
    }

    let mut body = vec![0u8; len + CRLF.len()];
    reader.read_exact(&mut body)?;
    if !body.ends_with(CRLF) {
        return Err(KvError::Protocol("bulk string not terminated by CRLF".to_string()));
    }
    body.truncate(len);
    Ok(Some(Bytes::from(body)))
}

/// Read `count * per_entry` children; `None` for the `-1` null form
fn read_children<R: BufRead>(
    reader: &mut R,
    count_field: &[u8],
    per_entry: usize,
    depth: usize,
) -> Result<Option<Vec<Reply>>> {
    let count = parse_integer(count_field)?;
    if count < 0 {
        return Ok(None);
    }
    let total = (count as usize).saturating_mul(per_entry);
    if total > MAX_ELEMENTS {
        return Err(KvError::Protocol(format!(
            "Too many elements: {} (max {})",
            total, MAX_ELEMENTS
        )));
    }

    let mut children = Vec::with_capacity(total.min(1024));
    for _ in 0..total {
        children.push(read_value(reader, depth + 1)?);
    }
    Ok(Some(children))
}

fn parse_integer(field: &[u8]) -> Result<i64> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| KvError::Protocol(format!("invalid integer: {}", text(field))))
}

/// Verbatim bodies start with a 3-byte format and a colon (`txt:`)
fn strip_verbatim_format(data: &[u8]) -> String {
    if data.len() >= 4 && data[3] == b':' {
        text(&data[4..])
    } else {
        text(data)
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
