//! Decoder Tests
//!
//! Tests for tag dispatch and the registered scalar and composite conversions.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use bytes::Bytes;
use kvfmt::decode::{decode, decode_opt, NIL_TEXT};
use kvfmt::{DecodeError, Reply};

#[path = "../common/mod.rs"]
mod common;

use common::{bulk, bulk_array};

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_nil_is_nil_for_every_type() {
    assert_eq!(decode::<String>(&Reply::Nil), Err(DecodeError::Nil));
    assert_eq!(decode::<i64>(&Reply::Nil), Err(DecodeError::Nil));
    assert_eq!(decode::<f64>(&Reply::Nil), Err(DecodeError::Nil));
    assert_eq!(decode::<Vec<String>>(&Reply::Nil), Err(DecodeError::Nil));
    assert_eq!(decode::<(String, i64)>(&Reply::Nil), Err(DecodeError::Nil));
    assert_eq!(decode::<Reply>(&Reply::Nil), Err(DecodeError::Nil));
}

#[test]
fn test_error_reply_carries_server_text() {
    let reply = Reply::error("WRONGTYPE Operation against a key holding the wrong kind of value");
    let err = decode::<i64>(&reply).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Server(
            "WRONGTYPE Operation against a key holding the wrong kind of value".to_string()
        )
    );
    assert_eq!(err.code(), 6);
}

#[test]
fn test_error_codes() {
    assert_eq!(DecodeError::Failed.code(), -1);
    assert_eq!(DecodeError::Nil.code(), 4);
    assert!(DecodeError::Nil.is_nil());
    assert!(!DecodeError::Failed.is_nil());
}

#[test]
fn test_missing_reply_is_failure() {
    assert_eq!(decode_opt::<String>(None), Err(DecodeError::Failed));
    assert_eq!(decode_opt::<i64>(Some(&Reply::Integer(3))), Ok(3));
}

#[test]
fn test_unregistered_combinations_fail() {
    assert_eq!(decode::<i64>(&Reply::Array(vec![])), Err(DecodeError::Failed));
    assert_eq!(decode::<Vec<String>>(&bulk("x")), Err(DecodeError::Failed));
    assert_eq!(decode::<(String, String)>(&Reply::Integer(1)), Err(DecodeError::Failed));
    assert_eq!(decode::<bool>(&bulk("true")), Err(DecodeError::Failed));
    assert_eq!(decode::<i64>(&Reply::Status("OK".into())), Err(DecodeError::Failed));
}

// =============================================================================
// Scalar Conversion Tests
// =============================================================================

#[test]
fn test_integer_reply() {
    assert_eq!(decode::<i64>(&Reply::Integer(42)), Ok(42));
    assert_eq!(decode::<String>(&Reply::Integer(42)), Ok("42".to_string()));
    assert_eq!(decode::<f64>(&Reply::Integer(42)), Ok(42.0));
    assert_eq!(decode::<bool>(&Reply::Integer(1)), Ok(true));
    assert_eq!(decode::<bool>(&Reply::Integer(0)), Ok(false));
}

#[test]
fn test_integer_range_checked() {
    assert_eq!(decode::<i32>(&Reply::Integer(7)), Ok(7));
    assert_eq!(decode::<i32>(&Reply::Integer(i64::from(i32::MAX) + 1)), Err(DecodeError::Failed));
    assert_eq!(decode::<u64>(&Reply::Integer(-1)), Err(DecodeError::Failed));
}

#[test]
fn test_numeric_text() {
    assert_eq!(decode::<i64>(&bulk("123")), Ok(123));
    assert_eq!(decode::<i64>(&bulk(" -5 ")), Ok(-5));
    assert_eq!(decode::<i64>(&bulk("12abc")), Err(DecodeError::Failed));
    assert_eq!(decode::<f64>(&bulk("2.5")), Ok(2.5));
    assert_eq!(decode::<f64>(&bulk("nope")), Err(DecodeError::Failed));
}

#[test]
fn test_text_replies() {
    assert_eq!(decode::<String>(&bulk("hello")), Ok("hello".to_string()));
    assert_eq!(decode::<String>(&Reply::status("OK")), Ok("OK".to_string()));
    assert_eq!(
        decode::<String>(&Reply::VerbatimString("note".into())),
        Ok("note".to_string())
    );
    assert_eq!(decode::<Bytes>(&bulk("raw")), Ok(Bytes::from_static(b"raw")));
}

#[test]
fn test_resp3_scalars() {
    assert_eq!(decode::<f64>(&Reply::Double("3.25".into())), Ok(3.25));
    assert_eq!(decode::<String>(&Reply::Double("3.25".into())), Ok("3.25".to_string()));
    assert_eq!(decode::<bool>(&Reply::Boolean(true)), Ok(true));
    assert_eq!(
        decode::<String>(&Reply::BigNumber("123456789012345678901234567890".into())),
        Ok("123456789012345678901234567890".to_string())
    );
}

#[test]
fn test_reply_passthrough() {
    let reply = Reply::Array(vec![bulk("a"), Reply::Integer(1)]);
    assert_eq!(decode::<Reply>(&reply), Ok(reply.clone()));
}

// =============================================================================
// Pair Tests
// =============================================================================

#[test]
fn test_single_pair() {
    let reply = Reply::Array(vec![bulk("ada"), bulk("12")]);
    assert_eq!(decode::<(String, i64)>(&reply), Ok(("ada".to_string(), 12)));
}

#[test]
fn test_single_pair_needs_two_elements() {
    let reply = Reply::Array(vec![bulk("ada")]);
    assert_eq!(decode::<(String, String)>(&reply), Err(DecodeError::Failed));
}

#[test]
fn test_single_pair_invalid_member() {
    let reply = Reply::Array(vec![bulk("ada"), bulk("not-a-number")]);
    assert_eq!(decode::<(String, i64)>(&reply), Err(DecodeError::Failed));
}

#[test]
fn test_pair_list_keeps_order() {
    let reply = bulk_array(&["k1", "v1", "k2", "v2"]);
    assert_eq!(
        decode::<Vec<(String, String)>>(&reply),
        Ok(vec![
            ("k1".to_string(), "v1".to_string()),
            ("k2".to_string(), "v2".to_string()),
        ])
    );
}

#[test]
fn test_pair_list_odd_count_fails() {
    let reply = bulk_array(&["k1", "v1", "k2"]);
    assert_eq!(decode::<Vec<(String, String)>>(&reply), Err(DecodeError::Failed));
    assert_eq!(
        decode::<HashMap<String, String>>(&reply),
        Err(DecodeError::Failed)
    );
}

#[test]
fn test_pair_list_drops_undecodable_pairs() {
    let reply = bulk_array(&["a", "1", "b", "x", "c", "3"]);
    assert_eq!(
        decode::<Vec<(String, i64)>>(&reply),
        Ok(vec![("a".to_string(), 1), ("c".to_string(), 3)])
    );
}

#[test]
fn test_scored_members() {
    let reply = bulk_array(&["ada", "10", "bob", "7.5"]);
    assert_eq!(
        decode::<Vec<(String, f64)>>(&reply),
        Ok(vec![("ada".to_string(), 10.0), ("bob".to_string(), 7.5)])
    );
}

// =============================================================================
// Sequence Tests
// =============================================================================

#[test]
fn test_string_sequence_substitutes_nil_marker() {
    let reply = Reply::Array(vec![bulk("a"), Reply::Nil, bulk("b")]);
    assert_eq!(
        decode::<Vec<String>>(&reply),
        Ok(vec!["a".to_string(), NIL_TEXT.to_string(), "b".to_string()])
    );
}

#[test]
fn test_integer_sequence_drops_bad_elements() {
    let reply = Reply::Array(vec![bulk("1"), bulk("x"), Reply::Integer(3), Reply::Nil]);
    assert_eq!(decode::<Vec<i64>>(&reply), Ok(vec![1, 3]));
}

#[test]
fn test_empty_array() {
    assert_eq!(decode::<Vec<String>>(&Reply::Array(vec![])), Ok(vec![]));
    assert_eq!(
        decode::<HashMap<String, String>>(&Reply::Array(vec![])),
        Ok(HashMap::new())
    );
}

#[test]
fn test_other_sequence_containers() {
    let reply = bulk_array(&["b", "a", "b"]);

    let deque: VecDeque<String> = decode(&reply).unwrap();
    assert_eq!(deque, VecDeque::from(vec!["b".to_string(), "a".to_string(), "b".to_string()]));

    let ordered: BTreeSet<String> = decode(&reply).unwrap();
    assert_eq!(ordered.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);

    let unique: HashSet<String> = decode(&reply).unwrap();
    assert_eq!(unique.len(), 2);
}

#[test]
fn test_set_and_push_tags() {
    let set = Reply::Set(vec![Reply::Integer(1), Reply::Integer(2)]);
    assert_eq!(decode::<Vec<i64>>(&set), Ok(vec![1, 2]));

    let push = Reply::Push(vec![bulk("message"), bulk("hi")]);
    assert_eq!(
        decode::<Vec<String>>(&push),
        Ok(vec!["message".to_string(), "hi".to_string()])
    );
}

#[test]
fn test_map_tag_into_every_sequence_container() {
    let reply = Reply::Map(vec![bulk("k1"), bulk("v1"), bulk("k2"), bulk("v2")]);
    let expected = ["k1", "v1", "k2", "v2"];

    let list: Vec<String> = decode(&reply).unwrap();
    assert_eq!(list, expected);

    let deque: VecDeque<String> = decode(&reply).unwrap();
    assert_eq!(deque.len(), 4);

    let ordered: BTreeSet<String> = decode(&reply).unwrap();
    assert_eq!(ordered.len(), 4);

    let unique: HashSet<String> = decode(&reply).unwrap();
    assert!(expected.iter().all(|item| unique.contains(*item)));
    assert_eq!(unique.len(), 4);
}

#[test]
fn test_nested_sequences() {
    let reply = Reply::Array(vec![bulk_array(&["a", "b"]), bulk_array(&["c"])]);
    assert_eq!(
        decode::<Vec<Vec<String>>>(&reply),
        Ok(vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ])
    );
}

#[test]
fn test_cursor_and_members_shape() {
    let reply = Reply::Array(vec![bulk("17"), bulk_array(&["m1", "m2"])]);
    assert_eq!(
        decode::<(u64, Vec<String>)>(&reply),
        Ok((17, vec!["m1".to_string(), "m2".to_string()]))
    );
}

// =============================================================================
// Map Tests
// =============================================================================

#[test]
fn test_hash_map_from_flat_array() {
    let reply = bulk_array(&["name", "ada", "level", "3"]);
    let map: HashMap<String, String> = decode(&reply).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["name"], "ada");
    assert_eq!(map["level"], "3");
}

#[test]
fn test_btree_map_from_map_tag() {
    let reply = Reply::Map(vec![
        Reply::status("b"),
        Reply::Integer(2),
        Reply::status("a"),
        Reply::Integer(1),
    ]);
    let map: BTreeMap<String, i64> = decode(&reply).unwrap();
    assert_eq!(
        map.into_iter().collect::<Vec<_>>(),
        vec![("a".to_string(), 1), ("b".to_string(), 2)]
    );
}

#[test]
fn test_map_duplicate_key_keeps_last() {
    let reply = bulk_array(&["k", "1", "k", "2"]);
    let map: HashMap<String, i64> = decode(&reply).unwrap();
    assert_eq!(map.get("k"), Some(&2));
}
