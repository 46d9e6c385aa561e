//! Reply definitions
//!
//! A reply is the dynamically tagged value the store sends back for every
//! command. Composite tags own their children; dropping a reply releases the
//! whole subtree exactly once.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Runtime type marker of a reply
///
/// Discriminants match the store client library's reply-type constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ReplyTag {
    String = 1,
    Array = 2,
    Integer = 3,
    Nil = 4,
    Status = 5,
    Error = 6,
    Double = 7,
    Boolean = 8,
    Map = 9,
    Set = 10,
    Attribute = 11,
    Push = 12,
    BigNumber = 13,
    VerbatimString = 14,
}

impl ReplyTag {
    /// True for tags whose payload is a sequence of child replies
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            ReplyTag::Array | ReplyTag::Map | ReplyTag::Set | ReplyTag::Attribute | ReplyTag::Push
        )
    }
}

impl fmt::Display for ReplyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyTag::String => "string",
            ReplyTag::Array => "array",
            ReplyTag::Integer => "integer",
            ReplyTag::Nil => "nil",
            ReplyTag::Status => "status",
            ReplyTag::Error => "error",
            ReplyTag::Double => "double",
            ReplyTag::Boolean => "boolean",
            ReplyTag::Map => "map",
            ReplyTag::Set => "set",
            ReplyTag::Attribute => "attribute",
            ReplyTag::Push => "push",
            ReplyTag::BigNumber => "big-number",
            ReplyTag::VerbatimString => "verbatim-string",
        };
        f.write_str(name)
    }
}

/// A reply received from the store
///
/// The payload kind is fixed by the variant: text, a 64-bit integer, or an
/// ordered sequence of children. `Map` children are stored flat as
/// alternating key/value entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Bulk string (binary safe)
    String(Bytes),
    Array(Vec<Reply>),
    Integer(i64),
    Nil,
    /// Simple status line such as `OK`
    Status(String),
    /// Error line sent by the server
    Error(String),
    /// RESP3 double, kept in its textual wire form
    Double(String),
    Boolean(bool),
    Map(Vec<Reply>),
    Set(Vec<Reply>),
    Attribute(Vec<Reply>),
    Push(Vec<Reply>),
    BigNumber(String),
    /// Verbatim string content without its format prefix
    VerbatimString(String),
}

impl Reply {
    /// Bulk string reply from anything byte-like
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::String(data.into())
    }

    pub fn status(text: impl Into<String>) -> Self {
        Reply::Status(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Reply::Error(text.into())
    }

    /// Get the reply tag
    pub fn tag(&self) -> ReplyTag {
        match self {
            Reply::String(_) => ReplyTag::String,
            Reply::Array(_) => ReplyTag::Array,
            Reply::Integer(_) => ReplyTag::Integer,
            Reply::Nil => ReplyTag::Nil,
            Reply::Status(_) => ReplyTag::Status,
            Reply::Error(_) => ReplyTag::Error,
            Reply::Double(_) => ReplyTag::Double,
            Reply::Boolean(_) => ReplyTag::Boolean,
            Reply::Map(_) => ReplyTag::Map,
            Reply::Set(_) => ReplyTag::Set,
            Reply::Attribute(_) => ReplyTag::Attribute,
            Reply::Push(_) => ReplyTag::Push,
            Reply::BigNumber(_) => ReplyTag::BigNumber,
            Reply::VerbatimString(_) => ReplyTag::VerbatimString,
        }
    }

    /// Children of a composite reply
    pub fn children(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items)
            | Reply::Map(items)
            | Reply::Set(items)
            | Reply::Attribute(items)
            | Reply::Push(items) => Some(items),
            _ => None,
        }
    }

    /// Textual payload of a scalar reply, if it carries one
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Reply::String(data) => Some(String::from_utf8_lossy(data)),
            Reply::Status(text)
            | Reply::Error(text)
            | Reply::Double(text)
            | Reply::BigNumber(text)
            | Reply::VerbatimString(text) => Some(Cow::Borrowed(text)),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }
}

impl fmt::Display for Reply {
    /// Renders the reply the way the store's command line client does
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Nil => f.write_str("(nil)"),
            Reply::Integer(value) => write!(f, "(integer) {}", value),
            Reply::Boolean(value) => write!(f, "({})", value),
            Reply::Error(text) => write!(f, "(error) {}", text),
            Reply::String(data) => write!(f, "\"{}\"", String::from_utf8_lossy(data)),
            Reply::Status(text)
            | Reply::Double(text)
            | Reply::BigNumber(text)
            | Reply::VerbatimString(text) => f.write_str(text),
            Reply::Array(items)
            | Reply::Map(items)
            | Reply::Set(items)
            | Reply::Attribute(items)
            | Reply::Push(items) => {
                if items.is_empty() {
                    return f.write_str("(empty array)");
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
        }
    }
}
