//! Conversion registry
//!
//! [`FromReply`] has one hook per reply tag. Every hook defaults to a
//! "not convertible" failure; a type registers a (tag, type) conversion by
//! overriding the matching hook. New types register independently of the
//! dispatcher in [`decode`](super::decode).

use std::any::type_name;

use bytes::Bytes;

use super::decode;
use crate::error::{DecodeError, Decoded};
use crate::protocol::{Reply, ReplyTag};

/// Textual marker used in place of undecodable text elements
pub const NIL_TEXT: &str = "(nil)";

/// Fallback for tags with no registered conversion
pub(crate) fn not_convertible<T>(tag: ReplyTag) -> Decoded<T> {
    tracing::debug!("{} reply not convertible to {}", tag, type_name::<T>());
    Err(DecodeError::Failed)
}

/// Conversion from a store reply into a static type
///
/// `Nil` and `Error` replies never reach these hooks; the dispatcher turns
/// them into [`DecodeError::Nil`] and [`DecodeError::Server`].
pub trait FromReply: Sized {
    fn from_string(_data: &Bytes) -> Decoded<Self> {
        not_convertible(ReplyTag::String)
    }

    fn from_integer(_value: i64) -> Decoded<Self> {
        not_convertible(ReplyTag::Integer)
    }

    fn from_status(_text: &str) -> Decoded<Self> {
        not_convertible(ReplyTag::Status)
    }

    fn from_double(_text: &str) -> Decoded<Self> {
        not_convertible(ReplyTag::Double)
    }

    fn from_boolean(_value: bool) -> Decoded<Self> {
        not_convertible(ReplyTag::Boolean)
    }

    fn from_big_number(_text: &str) -> Decoded<Self> {
        not_convertible(ReplyTag::BigNumber)
    }

    fn from_verbatim(_text: &str) -> Decoded<Self> {
        not_convertible(ReplyTag::VerbatimString)
    }

    fn from_array(_items: &[Reply]) -> Decoded<Self> {
        not_convertible(ReplyTag::Array)
    }

    fn from_map(_items: &[Reply]) -> Decoded<Self> {
        not_convertible(ReplyTag::Map)
    }

    fn from_set(_items: &[Reply]) -> Decoded<Self> {
        not_convertible(ReplyTag::Set)
    }

    fn from_attribute(_items: &[Reply]) -> Decoded<Self> {
        not_convertible(ReplyTag::Attribute)
    }

    fn from_push(_items: &[Reply]) -> Decoded<Self> {
        not_convertible(ReplyTag::Push)
    }

    /// Decode the children of a composite reply as a sequence of `Self`
    ///
    /// Each child is decoded on its own. A child that fails is replaced by
    /// [`FromReply::nil_placeholder`] when there is one, and dropped
    /// otherwise. Pair types override this to read alternating key/value
    /// children instead.
    fn from_elements(items: &[Reply]) -> Decoded<Vec<Self>> {
        Ok(items
            .iter()
            .filter_map(|item| decode::<Self>(item).ok().or_else(Self::nil_placeholder))
            .collect())
    }

    /// Stand-in for an element that could not be decoded
    fn nil_placeholder() -> Option<Self> {
        None
    }
}

/// Types with a registered conversion from bulk-string replies
///
/// Commands whose reply is a bulk string bound their type parameter on
/// this, so asking for an unsupported type fails to compile.
pub trait FromScalarReply: FromReply {}

/// Types with a registered conversion from array replies
pub trait FromArrayReply: FromReply {}

// =============================================================================
// Text
// =============================================================================

impl FromReply for String {
    fn from_string(data: &Bytes) -> Decoded<Self> {
        Ok(String::from_utf8_lossy(data).into_owned())
    }

    fn from_integer(value: i64) -> Decoded<Self> {
        Ok(value.to_string())
    }

    fn from_status(text: &str) -> Decoded<Self> {
        Ok(text.to_string())
    }

    fn from_double(text: &str) -> Decoded<Self> {
        Ok(text.to_string())
    }

    fn from_big_number(text: &str) -> Decoded<Self> {
        Ok(text.to_string())
    }

    fn from_verbatim(text: &str) -> Decoded<Self> {
        Ok(text.to_string())
    }

    fn nil_placeholder() -> Option<Self> {
        Some(NIL_TEXT.to_string())
    }
}

impl FromScalarReply for String {}

impl FromReply for Bytes {
    fn from_string(data: &Bytes) -> Decoded<Self> {
        Ok(data.clone())
    }

    fn from_status(text: &str) -> Decoded<Self> {
        Ok(Bytes::copy_from_slice(text.as_bytes()))
    }

    fn from_verbatim(text: &str) -> Decoded<Self> {
        Ok(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl FromScalarReply for Bytes {}

// =============================================================================
// Numbers
// =============================================================================

/// Parse a numeric bulk string; anything that is not a number fails
fn parse_text<T: std::str::FromStr>(data: &[u8]) -> Decoded<T> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|text| text.trim().parse::<T>().ok())
        .ok_or_else(|| {
            tracing::debug!(
                "'{}' is not a valid {}",
                String::from_utf8_lossy(data),
                type_name::<T>()
            );
            DecodeError::Failed
        })
}

macro_rules! integer_conversion {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromReply for $ty {
                fn from_integer(value: i64) -> Decoded<Self> {
                    <$ty>::try_from(value).map_err(|_| {
                        tracing::debug!("{} out of range for {}", value, stringify!($ty));
                        DecodeError::Failed
                    })
                }

                fn from_string(data: &Bytes) -> Decoded<Self> {
                    parse_text(data)
                }
            }

            impl FromScalarReply for $ty {}
        )*
    };
}

integer_conversion!(i32, i64, u32, u64, usize);

impl FromReply for f64 {
    fn from_string(data: &Bytes) -> Decoded<Self> {
        parse_text(data)
    }

    fn from_integer(value: i64) -> Decoded<Self> {
        Ok(value as f64)
    }

    fn from_double(text: &str) -> Decoded<Self> {
        parse_text(text.as_bytes())
    }
}

impl FromScalarReply for f64 {}

impl FromReply for bool {
    fn from_integer(value: i64) -> Decoded<Self> {
        Ok(value != 0)
    }

    fn from_boolean(value: bool) -> Decoded<Self> {
        Ok(value)
    }
}

// =============================================================================
// Passthrough
// =============================================================================

/// Keeps the reply as-is (nil and error replies still surface as failures)
impl FromReply for Reply {
    fn from_string(data: &Bytes) -> Decoded<Self> {
        Ok(Reply::String(data.clone()))
    }

    fn from_integer(value: i64) -> Decoded<Self> {
        Ok(Reply::Integer(value))
    }

    fn from_status(text: &str) -> Decoded<Self> {
        Ok(Reply::Status(text.to_string()))
    }

    fn from_double(text: &str) -> Decoded<Self> {
        Ok(Reply::Double(text.to_string()))
    }

    fn from_boolean(value: bool) -> Decoded<Self> {
        Ok(Reply::Boolean(value))
    }

    fn from_big_number(text: &str) -> Decoded<Self> {
        Ok(Reply::BigNumber(text.to_string()))
    }

    fn from_verbatim(text: &str) -> Decoded<Self> {
        Ok(Reply::VerbatimString(text.to_string()))
    }

    fn from_array(items: &[Reply]) -> Decoded<Self> {
        Ok(Reply::Array(items.to_vec()))
    }

    fn from_map(items: &[Reply]) -> Decoded<Self> {
        Ok(Reply::Map(items.to_vec()))
    }

    fn from_set(items: &[Reply]) -> Decoded<Self> {
        Ok(Reply::Set(items.to_vec()))
    }

    fn from_attribute(items: &[Reply]) -> Decoded<Self> {
        Ok(Reply::Attribute(items.to_vec()))
    }

    fn from_push(items: &[Reply]) -> Decoded<Self> {
        Ok(Reply::Push(items.to_vec()))
    }

    fn nil_placeholder() -> Option<Self> {
        Some(Reply::Nil)
    }
}
