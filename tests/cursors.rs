// Detached cursor and view suite, public API only.
//
// Invariants exercised:
// - A cursor drains exactly the live pairs, skipping recycled slots.
// - Any mutating call invalidates live cursors (checked builds fault on
//   the next advance), including calls whose net effect was nothing.
// - Lookups, views, and other cursors never invalidate.
// - Views copy nothing: they observe mutations live and compare by
//   underlying-map identity.

use arena_hashmap::{ArenaHashMap, Cursor};
use std::collections::BTreeSet;

fn fragmented() -> ArenaHashMap<u32, u32> {
    let mut m = ArenaHashMap::new();
    for k in 0..30 {
        m.insert(k, k * 11);
    }
    for k in (0..30).step_by(5) {
        m.remove(&k);
    }
    m
}

#[test]
fn cursor_drains_live_pairs_once() {
    let m = fragmented();
    let mut cur = m.cursor();
    let mut seen = BTreeSet::new();
    while let Some((k, v)) = cur.next(&m) {
        assert_eq!(*v, *k * 11);
        assert!(seen.insert(*k), "pair yielded twice");
    }
    assert_eq!(seen.len(), m.len());
}

#[test]
fn cursors_are_independent() {
    let m = fragmented();
    let mut a = m.cursor();
    let mut b = m.cursor();
    let first_a = a.next(&m).map(|(k, _)| *k);
    let _ = a.next(&m);
    let first_b = b.next(&m).map(|(k, _)| *k);
    assert_eq!(first_a, first_b, "each cursor starts from the beginning");
}

#[test]
fn cursor_is_plain_data() {
    let m = fragmented();
    let mut a = m.cursor();
    let _ = a.next(&m);
    let mut b: Cursor = a; // Copy
    assert_eq!(
        a.next(&m).map(|(k, _)| *k),
        b.next(&m).map(|(k, _)| *k),
        "a copied cursor resumes from the same position"
    );
}

#[test]
fn key_and_value_cursors_agree_with_views() {
    let m = fragmented();
    let mut kc = m.key_cursor();
    let mut keys = BTreeSet::new();
    while let Some(k) = kc.next(&m) {
        keys.insert(*k);
    }
    let view_keys: BTreeSet<u32> = m.key_view().iter().copied().collect();
    assert_eq!(keys, view_keys);

    let mut vc = m.value_cursor();
    let mut values = BTreeSet::new();
    while let Some(v) = vc.next(&m) {
        values.insert(*v);
    }
    let view_values: BTreeSet<u32> = m.value_view().iter().copied().collect();
    assert_eq!(values, view_values);
}

#[test]
fn views_track_mutations_live() {
    let mut m = fragmented();
    let len = m.len();
    m.insert(1000, 1);
    let keys = m.key_view();
    let values = m.value_view();
    assert_eq!(keys.len(), len + 1);
    assert!(keys.contains(&1000));
    assert!(values.contains(&1));
    assert_eq!(keys, m.key_view(), "views of one map are interchangeable");
}

#[cfg(any(debug_assertions, feature = "checked"))]
mod checked {
    use super::*;

    fn faults(f: impl FnOnce()) -> bool {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).is_err()
    }

    #[test]
    fn every_mutation_family_invalidates() {
        type Mutation = fn(&mut ArenaHashMap<u32, u32>);
        let mutations: [(&str, Mutation); 8] = [
            ("insert", |m| {
                m.insert(777, 0);
            }),
            ("try_insert of a present key", |m| {
                m.try_insert(1, 0);
            }),
            ("remove of an absent key", |m| {
                m.remove(&777);
            }),
            ("swap miss", |m| {
                let mut v = 0;
                m.swap(&777, &mut v);
            }),
            ("clear", |m| m.clear()),
            ("reserve", |m| m.reserve(1)),
            ("defragment no-op", |m| {
                m.defragment(false);
            }),
            ("trim_excess no-op", |m| {
                m.trim_excess();
                m.trim_excess();
            }),
        ];
        for (what, mutate) in mutations {
            let mut m = fragmented();
            let mut cur = m.cursor();
            assert!(cur.next(&m).is_some());
            mutate(&mut m);
            assert!(
                faults(|| {
                    let _ = cur.next(&m);
                }),
                "{what} must invalidate a live cursor"
            );
        }
    }

    #[test]
    fn reads_leave_cursors_valid() {
        let m = fragmented();
        let mut cur = m.cursor();
        assert!(cur.next(&m).is_some());
        assert!(m.contains_key(&1));
        let _ = m.get(&2);
        let _ = m.get_key_value(&3);
        let _ = m.iter().count();
        let _ = m.key_view().len();
        let _ = m.value_cursor();
        assert!(cur.next(&m).is_some());
    }

    #[test]
    fn exhaustion_reuse_faults_until_reset() {
        let m = fragmented();
        let mut cur = m.cursor();
        while cur.next(&m).is_some() {}
        assert!(faults(|| {
            let _ = cur.next(&m);
        }));
        cur.reset();
        assert_eq!(std::iter::from_fn(|| cur.next(&m)).count(), m.len());
    }
}
