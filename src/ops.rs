//! Type-erased dispatch surface.
//!
//! `MapOps<K, V>` states the point-operation contract without naming the
//! hasher type, so generic algorithms can hold `&mut dyn MapOps<K, V>`
//! over any specialization of [`ArenaHashMap`]. The trait is implemented
//! by plain delegation to the inherent methods: both surfaces run the one
//! table engine, and code that names the concrete map type keeps calling
//! the inherent (non-virtual) methods because they shadow these.

use core::hash::{BuildHasher, Hash};

use crate::map::{ArenaHashMap, InsertError};

/// Object-safe map contract; semantics match the identically-named
/// methods on [`ArenaHashMap`].
pub trait MapOps<K, V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn contains_key(&self, key: &K) -> bool;

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn insert_new(&mut self, key: K, value: V) -> Result<(), InsertError>;

    fn try_insert(&mut self, key: K, value: V) -> bool;

    fn get_or_insert(&mut self, key: K, value: V) -> &mut V;

    fn swap(&mut self, key: &K, value: &mut V) -> bool;

    fn insert_or_swap(&mut self, key: K, value: &mut V) -> bool
    where
        V: Clone;

    fn remove(&mut self, key: &K) -> bool;

    fn take(&mut self, key: &K) -> Option<V>;

    fn take_entry(&mut self, key: &K) -> Option<(K, V)>;

    fn clear(&mut self);

    fn defragment(&mut self, force: bool) -> bool;

    fn trim_excess(&mut self) -> bool;
}

impl<K, V, S> MapOps<K, V> for ArenaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        ArenaHashMap::len(self)
    }

    fn capacity(&self) -> usize {
        ArenaHashMap::capacity(self)
    }

    fn contains_key(&self, key: &K) -> bool {
        ArenaHashMap::contains_key(self, key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ArenaHashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        ArenaHashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        ArenaHashMap::insert(self, key, value)
    }

    fn insert_new(&mut self, key: K, value: V) -> Result<(), InsertError> {
        ArenaHashMap::insert_new(self, key, value)
    }

    fn try_insert(&mut self, key: K, value: V) -> bool {
        ArenaHashMap::try_insert(self, key, value)
    }

    fn get_or_insert(&mut self, key: K, value: V) -> &mut V {
        ArenaHashMap::get_or_insert(self, key, value)
    }

    fn swap(&mut self, key: &K, value: &mut V) -> bool {
        ArenaHashMap::swap(self, key, value)
    }

    fn insert_or_swap(&mut self, key: K, value: &mut V) -> bool
    where
        V: Clone,
    {
        ArenaHashMap::insert_or_swap(self, key, value)
    }

    fn remove(&mut self, key: &K) -> bool {
        ArenaHashMap::remove(self, key)
    }

    fn take(&mut self, key: &K) -> Option<V> {
        ArenaHashMap::take(self, key)
    }

    fn take_entry(&mut self, key: &K) -> Option<(K, V)> {
        ArenaHashMap::take_entry(self, key)
    }

    fn clear(&mut self) {
        ArenaHashMap::clear(self)
    }

    fn defragment(&mut self, force: bool) -> bool {
        ArenaHashMap::defragment(self, force)
    }

    fn trim_excess(&mut self) -> bool {
        ArenaHashMap::trim_excess(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A consumer that only knows "some map from u32 to u32".
    fn churn(map: &mut dyn MapOps<u32, u32>) {
        for k in 0..50 {
            assert!(map.try_insert(k, k * 2));
        }
        for k in (0..50).step_by(2) {
            assert!(map.remove(&k));
        }
        map.defragment(true);
    }

    /// Invariant: behavior through the erased surface matches the
    /// concrete surface exactly.
    #[test]
    fn erased_and_concrete_agree() {
        let mut erased: ArenaHashMap<u32, u32> = ArenaHashMap::new();
        churn(&mut erased);

        let mut concrete: ArenaHashMap<u32, u32> = ArenaHashMap::new();
        for k in 0..50 {
            assert!(concrete.try_insert(k, k * 2));
        }
        for k in (0..50).step_by(2) {
            assert!(concrete.remove(&k));
        }
        concrete.defragment(true);

        assert_eq!(erased, concrete);
    }

    #[test]
    fn erased_point_operations() {
        let mut m: ArenaHashMap<String, i32> = ArenaHashMap::new();
        let map: &mut dyn MapOps<String, i32> = &mut m;

        assert!(map.is_empty());
        assert_eq!(map.insert("a".to_string(), 1), None);
        assert_eq!(map.insert("a".to_string(), 2), Some(1));
        assert_eq!(
            map.insert_new("a".to_string(), 3),
            Err(InsertError::DuplicateKey)
        );
        *map.get_or_insert("b".to_string(), 10) += 5;
        assert_eq!(map.get(&"b".to_string()), Some(&15));

        let mut v = 40;
        assert!(map.swap(&"a".to_string(), &mut v));
        assert_eq!(v, 2);
        assert!(!map.insert_or_swap("c".to_string(), &mut v));
        assert_eq!(map.get(&"c".to_string()), Some(&2));

        assert_eq!(map.take_entry(&"c".to_string()), Some(("c".to_string(), 2)));
        assert_eq!(map.take(&"zzz".to_string()), None);
        assert_eq!(map.len(), 2);
        map.clear();
        assert!(map.is_empty());
        assert!(map.trim_excess());
        assert_eq!(map.capacity(), 0);
    }
}
