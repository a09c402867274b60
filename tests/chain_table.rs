// ChainTable integration scenarios.
//
// Each test names the behavior under check. The core invariants exercised:
// - Size: len equals the number of distinct keys put and not removed.
// - Upsert: a second put on a key replaces its value, len unchanged.
// - Growth: the bucket count doubles on the put that sees load >= factor,
//   and every earlier entry stays retrievable.
// - Snapshot: sort returns every entry, ordered by the comparator.
// - Isolation: stored bytes do not change when the caller's buffers do.
mod common;

use chain_table::{
    ByValue, ChainTable, Djb2, DropValue, IntHash, PutOutcome, TableConfig, TableError,
};
use common::initialize_logger;
use std::cell::Cell;
use std::rc::Rc;

fn int_table(buckets: usize) -> ChainTable<u32, String, IntHash> {
    ChainTable::with_functions(
        TableConfig::new().initial_buckets(buckets),
        IntHash,
        ByValue,
        DropValue,
    )
    .expect("valid config")
}

fn str_table() -> ChainTable<String, i32, Djb2> {
    ChainTable::with_functions(TableConfig::new(), Djb2, ByValue, DropValue).expect("valid config")
}

// Test: two buckets, load factor 1.0, integer keys.
// Verifies: puts of 1 and 2 do not grow (pre-insert loads 0 and 0.5);
// put of 3 sees load 1.0 and doubles to 4; all keys survive.
#[test]
fn two_bucket_table_grows_on_third_put() {
    initialize_logger();
    let mut t = int_table(2);
    t.put(1, "a".into()).unwrap();
    t.put(2, "b".into()).unwrap();
    assert_eq!((t.len(), t.bucket_count()), (2, 2));

    t.put(3, "c".into()).unwrap();
    assert_eq!((t.len(), t.bucket_count()), (3, 4));
    for (k, v) in [(1, "a"), (2, "b"), (3, "c")] {
        assert_eq!(t.get(&k).map(String::as_str), Some(v));
    }
}

// Test: distinct keys.
// Verifies: len equals the number of distinct keys put.
#[test]
fn distinct_puts_count_every_key() {
    initialize_logger();
    let mut t = int_table(1);
    for k in 0..500u32 {
        assert_eq!(t.put(k, k.to_string()).unwrap(), PutOutcome::Inserted);
    }
    assert_eq!(t.len(), 500);
    assert!(t.bucket_count() >= 500);
}

// Test: upsert.
// Verifies: same key twice keeps len, later value wins.
#[test]
fn second_put_overwrites() {
    let mut t = str_table();
    t.put("k".into(), 1).unwrap();
    assert_eq!(t.put("k".into(), 2).unwrap(), PutOutcome::Replaced);
    assert_eq!(t.len(), 1);
    assert_eq!(t.get("k"), Some(&2));
}

// Test: removal.
// Verifies: removed keys report absent; missing keys leave len unchanged.
#[test]
fn removed_keys_are_absent() {
    let mut t = str_table();
    for (i, k) in ["a", "b", "c"].iter().enumerate() {
        t.put((*k).to_string(), i as i32).unwrap();
    }
    assert!(t.remove_entry("b"));
    assert!(!t.contains_key("b"));
    assert_eq!(t.get("b"), None);
    assert_eq!(t.len(), 2);

    assert!(!t.remove_entry("nope"));
    assert_eq!(t.len(), 2);
}

// Test: growth preserves values.
// Verifies: every value read before a series of doublings reads the same after.
#[test]
fn growth_preserves_values() {
    initialize_logger();
    let mut t = int_table(2);
    for k in 0..16u32 {
        t.put(k, format!("v{k}")).unwrap();
    }
    let before: Vec<(u32, String)> = (0..16u32).map(|k| (k, t.get(&k).unwrap().clone())).collect();
    let buckets = t.bucket_count();
    for k in 16..64u32 {
        t.put(k, format!("v{k}")).unwrap();
    }
    assert!(t.bucket_count() > buckets);
    for (k, v) in before {
        assert_eq!(t.get(&k), Some(&v));
    }
}

// Test: string-keyed sort.
// Verifies: lexicographic key order over "bob", "alice".
#[test]
fn sort_by_key_lexicographic() {
    let mut t = str_table();
    t.put("bob".into(), 2).unwrap();
    t.put("alice".into(), 1).unwrap();
    let keys: Vec<&str> = t
        .sort(|a, b| a.key().cmp(b.key()))
        .into_iter()
        .map(|e| e.key().as_str())
        .collect();
    assert_eq!(keys, ["alice", "bob"]);
}

// Test: sort completeness under a record-style comparator.
// Verifies: N entries in, N out; descending by value then ascending by key.
#[test]
fn sort_with_compound_comparator() {
    let mut t = str_table();
    for (k, v) in [("d", 1), ("a", 3), ("c", 3), ("b", 2), ("e", 1)] {
        t.put(k.into(), v).unwrap();
    }
    let order: Vec<(&str, i32)> = t
        .sort(|a, b| b.value().cmp(a.value()).then_with(|| a.key().cmp(b.key())))
        .into_iter()
        .map(|e| (e.key().as_str(), *e.value()))
        .collect();
    assert_eq!(order, [("a", 3), ("c", 3), ("b", 2), ("d", 1), ("e", 1)]);
}

// Test: caller buffers are copied.
// Verifies: mutating and dropping inputs after put_copy leaves stored bytes intact.
#[test]
fn stored_bytes_survive_caller_mutation() {
    let mut t: ChainTable<Vec<u8>, Vec<u8>, Djb2> =
        ChainTable::with_functions(TableConfig::new(), Djb2, ByValue, DropValue).unwrap();
    let mut key = b"alice".to_vec();
    let mut value = vec![0xde, 0xad, 0xbe, 0xef];
    t.put_copy(key.as_slice(), value.as_slice()).unwrap();
    key[0] = b'A';
    value.iter_mut().for_each(|b| *b = 0);
    assert!(t.get(&key).is_none());
    drop(key);
    drop(value);
    assert_eq!(t.get(b"alice".as_slice()), Some(&vec![0xde, 0xad, 0xbe, 0xef]));
}

// Test: get_mut aliases the stored value.
// Verifies: record-style field updates through the returned reference persist.
#[test]
fn get_mut_updates_record_in_place() {
    #[derive(Debug, PartialEq)]
    struct Record {
        score: i32,
        borrowed: Option<String>,
    }

    let mut t: ChainTable<String, Record, Djb2> =
        ChainTable::with_functions(TableConfig::new(), Djb2, ByValue, DropValue).unwrap();
    t.put("user".into(), Record { score: 100, borrowed: None }).unwrap();
    {
        let r = t.get_mut("user").unwrap();
        r.score -= 10;
        r.borrowed = Some("book".into());
    }
    assert_eq!(
        t.get("user"),
        Some(&Record { score: 90, borrowed: Some("book".into()) })
    );
}

// Test: release policy on drop.
// Verifies: dropping the table hands every remaining value to the policy once.
#[test]
fn drop_releases_every_value() {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    {
        let mut t = ChainTable::with_functions(
            TableConfig::new().initial_buckets(3),
            Djb2,
            ByValue,
            move |_: Vec<u32>| c.set(c.get() + 1),
        )
        .unwrap();
        for i in 0..20u32 {
            t.put(format!("k{i}"), vec![i]).unwrap();
        }
        assert_eq!(count.get(), 0);
    }
    assert_eq!(count.get(), 20);
}

// Test: configuration errors.
// Verifies: zero buckets and bad load factors are rejected up front.
#[test]
fn config_errors_surface() {
    assert!(matches!(
        ChainTable::<String, i32>::with_config(TableConfig::new().initial_buckets(0)),
        Err(TableError::ZeroBuckets)
    ));
    let mut t = int_table(2);
    assert!(matches!(
        t.put_with_load_factor(1, "x".into(), f64::NAN),
        Err(TableError::InvalidLoadFactor(_))
    ));
    assert!(t.is_empty());
    assert_eq!(
        TableError::ZeroBuckets.to_string(),
        "bucket count must be at least 1"
    );
}
