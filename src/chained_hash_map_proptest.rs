#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can call
// the private invariant checker after every operation.

use crate::chained_hash_map::ChainedHashMap;
use crate::hash::BucketHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Has(String),
    Mutate(usize, i32),
    Entries,
    Clear,
    Expand,
    Shrink,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-zA-Z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let has_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                has_pool.prop_map(|s: String| s),
                "[a-zA-Z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Has),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Entries),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Expand),
            1 => Just(OpI::Shrink),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run<S: BucketHasher>(
    mut sut: ChainedHashMap<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        let grow = matches!(op, OpI::Expand);
        match op {
            OpI::Set(i, v) => {
                let k = pool[i].clone();
                let fresh = !model.contains_key(&k);
                let buckets_before = sut.bucket_count();
                let prev = sut.set(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
                if fresh {
                    prop_assert!(
                        sut.len() as f64 <= 0.75 * sut.bucket_count() as f64,
                        "load bound violated after inserting a new key"
                    );
                } else {
                    prop_assert_eq!(sut.bucket_count(), buckets_before, "overwrite must not resize");
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.has(k));
                // Second removal is a no-op.
                prop_assert_eq!(sut.remove(k), None);
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.has(k), sut.get(k).is_some());
            }
            OpI::Has(s) => {
                prop_assert_eq!(sut.has(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(a), Some(b)) => {
                        *a = a.wrapping_add(d);
                        *b = b.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence disagrees with model"),
                }
            }
            OpI::Entries => {
                let s: BTreeSet<(String, i32)> =
                    sut.entries().into_iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeSet<(String, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
                prop_assert_eq!(sut.keys().len(), sut.len());
                prop_assert_eq!(sut.values().len(), sut.len());
            }
            OpI::Clear => {
                let buckets = sut.bucket_count();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), buckets);
                prop_assert!(sut.entries().is_empty());
            }
            OpI::Expand | OpI::Shrink => {
                let before: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                if grow {
                    sut.expand();
                } else {
                    sut.shrink();
                }
                let after: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(before, after, "resize must preserve every entry");
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `get` returns the latest `set` value for every live key.
// - `len` counts distinct live keys; re-sets never double count.
// - `remove` is idempotent and `has` agrees with `get`.
// - New keys keep the load factor at or below 0.75.
// - Resize and clear preserve the structural invariants.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(ChainedHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher so every key shares one chain.
#[derive(Clone, Default)]
struct ConstHasher;
impl BucketHasher for ConstHasher {
    fn hash_bytes(&self, _bytes: &[u8]) -> u64 {
        0
    }
}

// Property: Same invariants as above under worst-case collisions, which
// stresses head removal, interior splicing and chain relinking on resize.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(ChainedHashMap::with_hasher(ConstHasher), pool, ops)?;
    }
}
