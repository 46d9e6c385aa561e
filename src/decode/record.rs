//! Structured records
//!
//! A record is a plain struct whose fields are filled from a flat
//! `name value name value ...` reply, such as the one HGETALL returns.
//!
//! Decoding is best effort:
//! - field names the record does not declare are logged and skipped
//! - integer fields that do not parse are set to 0
//!
//! Only an empty reply or an odd element count fails the whole record.

use std::any::type_name;

use crate::error::{DecodeError, Decoded};
use crate::protocol::Reply;

/// Declared type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int64,
    Int32,
}

/// A parsed field value handed to a setter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int64(i64),
    Int32(i32),
}

/// Name, declared kind and setter of one record field
pub struct FieldDescriptor<R> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub set: fn(&mut R, FieldValue),
}

/// A struct that exposes its fields by name
///
/// Usually implemented through the [`record!`](crate::record) macro.
pub trait Record: Default + 'static {
    /// Field map of the record
    const FIELDS: &'static [FieldDescriptor<Self>];

    /// Look up a field by name
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::FIELDS.iter().find(|field| field.name == name)
    }
}

/// Rust types allowed as record fields
pub trait RecordField: Sized {
    const KIND: FieldKind;

    fn from_field_value(value: FieldValue) -> Self;
}

impl RecordField for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_field_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => text,
            FieldValue::Int64(n) => n.to_string(),
            FieldValue::Int32(n) => n.to_string(),
        }
    }
}

impl RecordField for i64 {
    const KIND: FieldKind = FieldKind::Int64;

    fn from_field_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Int64(n) => n,
            FieldValue::Int32(n) => i64::from(n),
            FieldValue::Text(text) => text.trim().parse().unwrap_or(0),
        }
    }
}

impl RecordField for i32 {
    const KIND: FieldKind = FieldKind::Int32;

    fn from_field_value(value: FieldValue) -> Self {
        match value {
            FieldValue::Int32(n) => n,
            FieldValue::Int64(n) => i32::try_from(n).unwrap_or(0),
            FieldValue::Text(text) => text.trim().parse().unwrap_or(0),
        }
    }
}

/// Populate a record from alternating field-name / field-value children
pub fn decode_record<R: Record>(items: &[Reply]) -> Decoded<R> {
    if items.is_empty() || items.len() % 2 != 0 {
        tracing::error!(
            "{}: reply with {} elements is invalid",
            type_name::<R>(),
            items.len()
        );
        return Err(DecodeError::Failed);
    }

    let mut record = R::default();
    for pair in items.chunks_exact(2) {
        let Some(name) = pair[0].as_text() else {
            tracing::warn!("{}: non-text field name {}", type_name::<R>(), pair[0].tag());
            continue;
        };
        let Some(field) = R::field(&name) else {
            tracing::warn!("{} has no field: {}", type_name::<R>(), name);
            continue;
        };
        let raw = match (pair[1].as_text(), pair[1].as_integer()) {
            (Some(text), _) => text.into_owned(),
            (None, Some(n)) => n.to_string(),
            (None, None) => {
                tracing::warn!("{}.{}: unusable value {}", type_name::<R>(), name, pair[1].tag());
                continue;
            }
        };

        let value = match field.kind {
            FieldKind::Text => FieldValue::Text(raw),
            FieldKind::Int64 => FieldValue::Int64(raw.trim().parse().unwrap_or(0)),
            FieldKind::Int32 => FieldValue::Int32(raw.trim().parse().unwrap_or(0)),
        };
        (field.set)(&mut record, value);
    }

    Ok(record)
}

/// Declare a struct and register it as a [`Record`] decodable from array
/// and map replies
///
/// ```
/// kvfmt::record! {
///     #[derive(Debug, Default)]
///     pub struct Player {
///         pub name: String,
///         pub score: i64,
///         pub level: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$field_meta])* $field_vis $field: $ty,)*
        }

        impl $crate::decode::Record for $name {
            const FIELDS: &'static [$crate::decode::FieldDescriptor<Self>] = &[
                $(
                    $crate::decode::FieldDescriptor {
                        name: stringify!($field),
                        kind: <$ty as $crate::decode::RecordField>::KIND,
                        set: |record: &mut $name, value: $crate::decode::FieldValue| {
                            record.$field =
                                <$ty as $crate::decode::RecordField>::from_field_value(value);
                        },
                    },
                )*
            ];
        }

        impl $crate::decode::FromReply for $name {
            fn from_array(items: &[$crate::protocol::Reply]) -> $crate::Decoded<Self> {
                $crate::decode::decode_record(items)
            }

            fn from_map(items: &[$crate::protocol::Reply]) -> $crate::Decoded<Self> {
                $crate::decode::decode_record(items)
            }
        }

        impl $crate::decode::FromArrayReply for $name {}
    };
}
