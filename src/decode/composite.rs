//! Composite conversions
//!
//! Decoding of array-shaped replies into pairs and containers:
//! - `(K, V)`: first two children
//! - `Vec<(K, V)>`, `HashMap`, `BTreeMap`: flat `k1 v1 k2 v2 ...` children
//! - `Vec<T>`, `VecDeque<T>`, `HashSet<T>`, `BTreeSet<T>`: one child per element
//!
//! Children are borrowed for the duration of their own decode only.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

use super::{decode, FromArrayReply, FromReply};
use crate::error::{DecodeError, Decoded};
use crate::protocol::Reply;

// =============================================================================
// Pairs
// =============================================================================

impl<K: FromReply, V: FromReply> FromReply for (K, V) {
    /// Single pair: needs at least two children, both decodable
    fn from_array(items: &[Reply]) -> Decoded<Self> {
        if items.len() < 2 {
            tracing::debug!("pair needs 2 elements, reply has {}", items.len());
            return Err(DecodeError::Failed);
        }

        match (decode::<K>(&items[0]), decode::<V>(&items[1])) {
            (Ok(key), Ok(value)) => Ok((key, value)),
            _ => {
                tracing::info!("pair key or value is invalid");
                Err(DecodeError::Failed)
            }
        }
    }

    /// Alternating key/value children; undecodable pairs are skipped
    fn from_elements(items: &[Reply]) -> Decoded<Vec<Self>> {
        if items.len() % 2 != 0 {
            tracing::error!("key/value reply has odd element count {}", items.len());
            return Err(DecodeError::Failed);
        }

        Ok(items
            .chunks_exact(2)
            .filter_map(|pair| match (decode::<K>(&pair[0]), decode::<V>(&pair[1])) {
                (Ok(key), Ok(value)) => Some((key, value)),
                _ => None,
            })
            .collect())
    }
}

impl<K: FromReply, V: FromReply> FromArrayReply for (K, V) {}

// =============================================================================
// Sequences
// =============================================================================

/// Registers every composite tag that carries a plain child sequence
macro_rules! sequence_conversion {
    ($ty:ident<$elem:ident> $(where $($bound:tt)+)?) => {
        impl<$elem: FromReply $(+ $($bound)+)?> FromReply for $ty<$elem> {
            fn from_array(items: &[Reply]) -> Decoded<Self> {
                Ok($elem::from_elements(items)?.into_iter().collect())
            }

            fn from_set(items: &[Reply]) -> Decoded<Self> {
                Self::from_array(items)
            }

            fn from_push(items: &[Reply]) -> Decoded<Self> {
                Self::from_array(items)
            }

            fn from_map(items: &[Reply]) -> Decoded<Self> {
                Self::from_array(items)
            }
        }

        impl<$elem: FromReply $(+ $($bound)+)?> FromArrayReply for $ty<$elem> {}
    };
}

sequence_conversion!(Vec<T>);
sequence_conversion!(VecDeque<T>);
sequence_conversion!(BTreeSet<T> where Ord);

impl<T: FromReply + Eq + Hash, S: BuildHasher + Default> FromReply for HashSet<T, S> {
    fn from_array(items: &[Reply]) -> Decoded<Self> {
        Ok(T::from_elements(items)?.into_iter().collect())
    }

    fn from_set(items: &[Reply]) -> Decoded<Self> {
        Self::from_array(items)
    }

    fn from_push(items: &[Reply]) -> Decoded<Self> {
        Self::from_array(items)
    }

    fn from_map(items: &[Reply]) -> Decoded<Self> {
        Self::from_array(items)
    }
}

impl<T: FromReply + Eq + Hash, S: BuildHasher + Default> FromArrayReply for HashSet<T, S> {}

// =============================================================================
// Maps
// =============================================================================

impl<K, V, S> FromReply for HashMap<K, V, S>
where
    K: FromReply + Eq + Hash,
    V: FromReply,
    S: BuildHasher + Default,
{
    fn from_array(items: &[Reply]) -> Decoded<Self> {
        Ok(<(K, V)>::from_elements(items)?.into_iter().collect())
    }

    fn from_map(items: &[Reply]) -> Decoded<Self> {
        Self::from_array(items)
    }
}

impl<K, V, S> FromArrayReply for HashMap<K, V, S>
where
    K: FromReply + Eq + Hash,
    V: FromReply,
    S: BuildHasher + Default,
{
}

impl<K: FromReply + Ord, V: FromReply> FromReply for BTreeMap<K, V> {
    fn from_array(items: &[Reply]) -> Decoded<Self> {
        Ok(<(K, V)>::from_elements(items)?.into_iter().collect())
    }

    fn from_map(items: &[Reply]) -> Decoded<Self> {
        Self::from_array(items)
    }
}

impl<K: FromReply + Ord, V: FromReply> FromArrayReply for BTreeMap<K, V> {}
