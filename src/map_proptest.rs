#![cfg(test)]

// Property tests for ArenaHashMap kept inside the crate so the structural
// invariant checker on the raw layer stays reachable.

use crate::map::{ArenaHashMap, InsertError};
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    TryInsert(usize, i32),
    InsertNew(usize, i32),
    GetOrInsert(usize, i32),
    Remove(usize),
    Take(usize),
    Swap(usize, i32),
    InsertOrSwap(usize, i32),
    Get(usize),
    Contains(usize),
    Mutate(usize, i32),
    Iterate,
    Defragment(bool),
    TrimExcess,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            8 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::TryInsert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertNew(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::GetOrInsert(i, v)),
            6 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Take),
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Swap(i, v)),
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertOrSwap(i, v)),
            4 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            2 => Just(Op::Iterate),
            2 => any::<bool>().prop_map(Op::Defragment),
            2 => Just(Op::TrimExcess),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State machine over ArenaHashMap against std::collections::HashMap,
// auditing the raw layer's structural invariants after every operation.
fn exercise<S>(
    mut sut: ArenaHashMap<String, i32, S>,
    pool: &[String],
    ops: &[Op],
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let key = |i: &usize| pool[*i].clone();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key(i);
                prop_assert_eq!(sut.insert(k.clone(), *v), model.insert(k, *v));
            }
            Op::TryInsert(i, v) => {
                let k = key(i);
                let absent = !model.contains_key(&k);
                prop_assert_eq!(sut.try_insert(k.clone(), *v), absent);
                if absent {
                    model.insert(k.clone(), *v);
                }
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::InsertNew(i, v) => {
                let k = key(i);
                match sut.insert_new(k.clone(), *v) {
                    Ok(()) => {
                        prop_assert!(!model.contains_key(&k), "strict add must fail on duplicate");
                        model.insert(k, *v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(model.contains_key(&k), "duplicate error only when present");
                    }
                }
            }
            Op::GetOrInsert(i, v) => {
                let k = key(i);
                let got = *sut.get_or_insert(k.clone(), *v);
                let expect = *model.entry(k).or_insert(*v);
                prop_assert_eq!(got, expect);
            }
            Op::Remove(i) => {
                let k = key(i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k).is_some());
            }
            Op::Take(i) => {
                let k = key(i);
                prop_assert_eq!(sut.take(&k), model.remove(&k));
            }
            Op::Swap(i, v) => {
                let k = key(i);
                let mut x = *v;
                let swapped = sut.swap(&k, &mut x);
                match model.get_mut(&k) {
                    Some(mv) => {
                        prop_assert!(swapped);
                        prop_assert_eq!(x, *mv, "swap must yield the prior value");
                        *mv = *v;
                    }
                    None => {
                        prop_assert!(!swapped);
                        prop_assert_eq!(x, *v, "miss must leave the argument untouched");
                    }
                }
            }
            Op::InsertOrSwap(i, v) => {
                let k = key(i);
                let mut x = *v;
                let existed = sut.insert_or_swap(k.clone(), &mut x);
                match model.get_mut(&k) {
                    Some(mv) => {
                        prop_assert!(existed);
                        prop_assert_eq!(x, *mv);
                        *mv = *v;
                    }
                    None => {
                        prop_assert!(!existed);
                        prop_assert_eq!(x, *v);
                        model.insert(k, *v);
                    }
                }
            }
            Op::Get(i) => {
                let k = key(i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get_key_value(&k).map(|(_, v)| v), model.get(&k));
            }
            Op::Contains(i) => {
                let k = key(i);
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::Mutate(i, d) => {
                let k = key(i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(*d);
                        *mv = mv.saturating_add(*d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "presence disagreement on {:?}", k),
                }
            }
            Op::Iterate => {
                let got: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let expect: BTreeSet<(String, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(got, expect);
                prop_assert_eq!(sut.keys().count(), model.len());
            }
            Op::Defragment(force) => {
                let before: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                sut.defragment(*force);
                let after: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(before, after, "defragment must not change content");
            }
            Op::TrimExcess => {
                sut.trim_excess();
                prop_assert!(sut.capacity() >= sut.len());
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op.
        sut.raw.check_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        exercise(ArenaHashMap::new(), &pool, &ops)?;
    }
}

// Collision variant: a constant hasher forces every key onto one chain,
// stressing equality probing, unlink positions, and defrag relinking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        exercise(ArenaHashMap::with_hasher(ConstBuildHasher), &pool, &ops)?;
    }
}
