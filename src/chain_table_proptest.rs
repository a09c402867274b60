#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can inspect
// bucket placement directly.

use crate::chain_table::{ChainTable, PutOutcome};
use crate::config::TableConfig;
use crate::functions::{int_hash, ByValue, Djb2, DropValue, IntHash, KeyHasher};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Take(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Sort,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Take),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Sort),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one table through `ops`, checking it against a hashbrown model after
// every step:
// - `put` reports Inserted/Replaced matching model presence; overwritten and
//   removed values reach the release policy, taken values do not.
// - `get`/`contains_key` parity with the model, including borrowed `&str` lookups.
// - `sort` returns every entry exactly once in non-decreasing key order.
// - `len` equals the model size and the total across buckets; the bucket
//   count never shrinks.
fn run_scenario<H>(hasher: H, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    H: KeyHasher<String> + KeyHasher<str>,
{
    let released = Rc::new(RefCell::new(Vec::new()));
    let sink = released.clone();
    let mut sut = ChainTable::with_functions(
        TableConfig::new().initial_buckets(2),
        hasher,
        ByValue,
        move |v: i32| sink.borrow_mut().push(v),
    )
    .expect("valid config");
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut expected_released: Vec<i32> = Vec::new();

    for op in ops {
        let buckets_before = sut.bucket_count();
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                let outcome = sut.put(k.clone(), v).expect("put");
                match model.insert(k, v) {
                    Some(old) => {
                        prop_assert_eq!(outcome, PutOutcome::Replaced);
                        expected_released.push(old);
                    }
                    None => prop_assert_eq!(outcome, PutOutcome::Inserted),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove_entry(k.as_str());
                match model.remove(k) {
                    Some(old) => {
                        prop_assert!(removed);
                        expected_released.push(old);
                    }
                    None => prop_assert!(!removed),
                }
                prop_assert!(!sut.contains_key(k.as_str()));
            }
            OpI::Take(i) => {
                let k = &pool[i];
                let taken = sut.take(k);
                let expected = model.remove_entry(k);
                prop_assert_eq!(taken, expected);
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k.as_str()) {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(k) {
                    *v = v.wrapping_add(d);
                }
            }
            OpI::Sort => {
                let snapshot = sut.sorted_by_key();
                prop_assert_eq!(snapshot.len(), model.len());
                for pair in snapshot.windows(2) {
                    prop_assert!(pair[0].key() < pair[1].key());
                }
                for e in &snapshot {
                    prop_assert_eq!(model.get(e.key()), Some(e.value()));
                }
            }
        }

        prop_assert!(sut.bucket_count() >= buckets_before);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());
        prop_assert_eq!(released.borrow().clone(), expected_released.clone());
    }

    drop(sut);
    prop_assert_eq!(released.borrow().len(), expected_released.len() + model.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(Djb2, pool, ops)?;
    }
}

// Every key collides; equality alone separates entries.
#[derive(Clone, Copy, Default)]
struct ConstHash;

impl KeyHasher<String> for ConstHash {
    fn hash_key(&self, _key: &String) -> u32 {
        0
    }
}

impl KeyHasher<str> for ConstHash {
    fn hash_key(&self, _key: &str) -> u32 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ConstHash, pool, ops)?;
    }
}

// Property: growth keeps every entry and places it under `hash % bucket_count`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_entries(
        keys in proptest::collection::hash_set(any::<u32>(), 0..200),
        buckets in 1usize..8,
    ) {
        let mut t = ChainTable::with_functions(
            TableConfig::new().initial_buckets(buckets),
            IntHash,
            ByValue,
            DropValue,
        ).expect("valid config");
        for &k in &keys {
            t.put(k, k.wrapping_mul(3)).expect("put");
        }
        prop_assert_eq!(t.len(), keys.len());
        prop_assert!(t.len() <= t.bucket_count());
        prop_assert_eq!(t.bucket_count() % buckets, 0);
        prop_assert!((t.bucket_count() / buckets).is_power_of_two());
        for &k in &keys {
            prop_assert_eq!(t.get(&k), Some(&k.wrapping_mul(3)));
        }
        for e in t.iter() {
            prop_assert_eq!(e.hash(), int_hash(*e.key()));
        }
    }
}
