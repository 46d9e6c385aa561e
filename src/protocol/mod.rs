//! Protocol Module
//!
//! Reply values and the RESP wire codec.
//!
//! ## Reply Tags
//! ```text
//! scalar:     String, Integer, Status, Error, Double, Boolean,
//!             BigNumber, VerbatimString, Nil
//! composite:  Array, Map, Set, Attribute, Push
//! ```
//!
//! Composite replies own their children. Decoding borrows a reply; the
//! caller that received it drops it once decoding is done.

mod reply;
mod codec;

pub use reply::{Reply, ReplyTag};
pub use codec::{
    decode_reply, encode_command, encode_reply, read_reply, write_command, MAX_BULK_SIZE,
    MAX_ELEMENTS, MAX_LINE_LENGTH, MAX_NESTING_DEPTH,
};
