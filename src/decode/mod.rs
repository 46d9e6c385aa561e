//! Decode Module
//!
//! Turns dynamically tagged replies into statically typed values.
//!
//! ## Dispatch
//! ```text
//!                 ┌──────────────┐
//!   &Reply ──────►│ decode::<T>  │── Nil ─────────► Err(DecodeError::Nil)
//!                 │  (tag match) │── Error ───────► Err(DecodeError::Server)
//!                 └──────┬───────┘
//!                        │ any other tag
//!                        ▼
//!              T::from_<tag>(payload)      (FromReply hook)
//!                        │
//!        registered ─────┴───── not registered
//!            │                        │
//!            ▼                        ▼
//!      Ok(T) / Err(Failed)       Err(Failed)
//! ```
//!
//! Composite hooks call back into [`decode`] for each child, so nested
//! shapes such as `Vec<(String, f64)>` decode recursively.

mod registry;
mod composite;
mod record;

pub use registry::{FromArrayReply, FromReply, FromScalarReply, NIL_TEXT};
pub use record::{decode_record, FieldDescriptor, FieldKind, FieldValue, Record, RecordField};

use crate::error::{DecodeError, Decoded};
use crate::protocol::Reply;

/// Decode a reply into `T`
///
/// The reply is only borrowed; the caller releases it afterwards.
pub fn decode<T: FromReply>(reply: &Reply) -> Decoded<T> {
    match reply {
        Reply::Nil => Err(DecodeError::Nil),
        Reply::Error(text) => {
            tracing::error!("Server error reply: {}", text);
            Err(DecodeError::Server(text.clone()))
        }
        Reply::String(data) => T::from_string(data),
        Reply::Integer(value) => T::from_integer(*value),
        Reply::Status(text) => T::from_status(text),
        Reply::Double(text) => T::from_double(text),
        Reply::Boolean(value) => T::from_boolean(*value),
        Reply::BigNumber(text) => T::from_big_number(text),
        Reply::VerbatimString(text) => T::from_verbatim(text),
        Reply::Array(items) => T::from_array(items),
        Reply::Map(items) => T::from_map(items),
        Reply::Set(items) => T::from_set(items),
        Reply::Attribute(items) => T::from_attribute(items),
        Reply::Push(items) => T::from_push(items),
    }
}

/// Decode a reply that may be absent
///
/// A missing reply is a generic failure.
pub fn decode_opt<T: FromReply>(reply: Option<&Reply>) -> Decoded<T> {
    match reply {
        Some(reply) => decode(reply),
        None => {
            tracing::error!("no reply");
            Err(DecodeError::Failed)
        }
    }
}
