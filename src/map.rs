//! `ArenaHashMap`: the comparator-specialized public surface.
//!
//! Every operation family walks a bucket chain at most once: lookups stop
//! at the first stored-hash-plus-`Eq` match, inserts splice new slots at
//! the chain head, removals carry a trailing link so splicing is O(1), and
//! the swap family combines its read and write into the same walk. The
//! hasher type is a generic parameter, so a map whose hasher is statically
//! known compiles to direct calls; the type-erased surface over the same
//! engine is [`crate::MapOps`].

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;

use hashbrown::hash_map::DefaultHashBuilder;

use crate::cursor::{Cursor, KeyCursor, ValueCursor};
use crate::guard::ReentryCheck;
use crate::raw::{fold_hash, RawMap};
use crate::view::{Iter, IterMut, KeyView, Keys, ValueView, Values};

/// Error from the strict-add entry point [`ArenaHashMap::insert_new`].
#[derive(Debug, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key is already present in the map"),
        }
    }
}

impl std::error::Error for InsertError {}

/// An open-hashing map over an index arena.
///
/// Collisions chain through per-slot links; removed slots are recycled
/// through a free list; growth and shrink follow a precomputed prime
/// ladder (see [`crate::MAX_CAPACITY`]). Single-threaded by design: the
/// type is `!Send + !Sync`, mirroring its single-writer model.
///
/// Any mutating operation (the insert, remove, and swap families,
/// `clear`, `reserve`, `defragment`, `trim_excess`) invalidates detached
/// cursors, even when it ends up changing nothing. Lookups and view or
/// cursor creation do not.
pub struct ArenaHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    pub(crate) raw: RawMap<K, V>,
    reentry: ReentryCheck,
}

impl<K, V> ArenaHashMap<K, V> {
    /// Empty map with the default build hasher. Allocates nothing until
    /// the first insert.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Empty map sized for at least `capacity` entries up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ArenaHashMap<K, V, S> {
    /// Empty map using an explicit hasher instance (the capability hook
    /// for stateful hashers).
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            raw: RawMap::new(),
            reentry: ReentryCheck::new(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let mut map = Self::with_hasher(hasher);
        map.raw.ensure_capacity(capacity);
        map
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Entries the map can hold before the next rehash.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Drop every entry, keeping the backing arrays for reuse.
    pub fn clear(&mut self) {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        self.raw.clear();
    }

    /// Make room for `additional` more entries with at most one rehash.
    pub fn reserve(&mut self, additional: usize) {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        self.raw.ensure_capacity(self.raw.len().saturating_add(additional));
    }

    /// Compact live entries to the front of the arena, discarding free
    /// slots. Without `force` this runs only once fragmentation passes the
    /// internal threshold; with `force` it runs whenever any slot is free.
    /// Returns whether the layout changed. Content is untouched either way.
    pub fn defragment(&mut self, force: bool) -> bool {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        self.raw.defragment(force)
    }

    /// Reallocate down to the smallest capacity rung that fits the current
    /// entry count, or release all storage when empty. Returns whether a
    /// reallocation happened.
    pub fn trim_excess(&mut self) -> bool {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        self.raw.trim_excess()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Iterate with mutable access to the values. In-place mutation
    /// through the yielded references does not invalidate cursors.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.raw)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(&self.raw)
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.raw)
    }

    /// Copyless live view of the keys; see [`KeyView`].
    pub fn key_view(&self) -> KeyView<'_, K, V, S> {
        KeyView::new(self)
    }

    /// Copyless live view of the values; see [`ValueView`].
    pub fn value_view(&self) -> ValueView<'_, K, V, S> {
        ValueView::new(self)
    }

    /// Detached all-pairs cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(&self.raw)
    }

    pub fn key_cursor(&self) -> KeyCursor {
        KeyCursor::new(&self.raw)
    }

    pub fn value_cursor(&self) -> ValueCursor {
        ValueCursor::new(&self.raw)
    }

    /// Clone every key into `dst` starting at `at`.
    ///
    /// Panics if `at` lies beyond `dst` or the remaining space cannot hold
    /// [`len`](Self::len) keys; nothing is written on a failed check.
    pub fn copy_keys_to(&self, dst: &mut [K], at: usize)
    where
        K: Clone,
    {
        self.check_copy_bounds(dst.len(), at);
        for (out, key) in dst[at..].iter_mut().zip(self.keys()) {
            *out = key.clone();
        }
    }

    /// Clone every value into `dst` starting at `at`; bounds as
    /// [`copy_keys_to`](Self::copy_keys_to).
    pub fn copy_values_to(&self, dst: &mut [V], at: usize)
    where
        V: Clone,
    {
        self.check_copy_bounds(dst.len(), at);
        for (out, value) in dst[at..].iter_mut().zip(self.values()) {
            *out = value.clone();
        }
    }

    /// Clone every pair into `dst` starting at `at`; bounds as
    /// [`copy_keys_to`](Self::copy_keys_to).
    pub fn copy_to(&self, dst: &mut [(K, V)], at: usize)
    where
        K: Clone,
        V: Clone,
    {
        self.check_copy_bounds(dst.len(), at);
        for (out, (key, value)) in dst[at..].iter_mut().zip(self.iter()) {
            *out = (key.clone(), value.clone());
        }
    }

    fn check_copy_bounds(&self, dst_len: usize, at: usize) {
        assert!(
            at <= dst_len,
            "copy offset {at} lies beyond the destination length {dst_len}"
        );
        assert!(
            dst_len - at >= self.raw.len(),
            "destination holds {} slots after offset {at}, need {}",
            dst_len - at,
            self.raw.len()
        );
    }
}

impl<K, V, S> ArenaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, key: &Q) -> u32
    where
        Q: ?Sized + Hash,
    {
        fold_hash(self.hasher.hash_one(key))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _token = self.reentry.enter();
        let hash = self.make_hash(key);
        self.raw.find(hash, |k| k.borrow() == key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _token = self.reentry.enter();
        let hash = self.make_hash(key);
        let index = self.raw.find(hash, |k| k.borrow() == key)?;
        Some(self.raw.value(index))
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _token = self.reentry.enter();
        let hash = self.make_hash(key);
        let index = self.raw.find(hash, |k| k.borrow() == key)?;
        Some(self.raw.pair(index))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _token = self.reentry.enter();
        let hash = self.make_hash(key);
        let index = self.raw.find(hash, |k| k.borrow() == key)?;
        Some(self.raw.value_mut(index))
    }

    /// The stored value cloned out, or `V::default()` on a miss.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Insert or replace. Returns the previous value when the key was
    /// already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        let hash = self.make_hash(&key);
        if let Some(index) = self.raw.find(hash, |k| *k == key) {
            return Some(mem::replace(self.raw.value_mut(index), value));
        }
        self.raw.insert_slot(hash, key, value);
        None
    }

    /// Insert only if absent; an existing entry is left untouched.
    /// Returns whether the pair was inserted.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        let hash = self.make_hash(&key);
        if self.raw.find(hash, |k| *k == key).is_some() {
            return false;
        }
        self.raw.insert_slot(hash, key, value);
        true
    }

    /// Strict add: rejects a duplicate key instead of touching it.
    pub fn insert_new(&mut self, key: K, value: V) -> Result<(), InsertError> {
        if self.try_insert(key, value) {
            Ok(())
        } else {
            Err(InsertError::DuplicateKey)
        }
    }

    /// The value for `key`, inserting `value` first when absent.
    pub fn get_or_insert(&mut self, key: K, value: V) -> &mut V {
        self.get_or_insert_with(key, move || value)
    }

    /// The value for `key`, inserting `default()` first when absent. The
    /// closure runs only on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        let hash = self.make_hash(&key);
        let index = match self.raw.find(hash, |k| *k == key) {
            Some(index) => index,
            None => {
                let value = default();
                self.raw.insert_slot(hash, key, value)
            }
        };
        self.raw.value_mut(index)
    }

    /// Exchange the stored value with `*value` in a single walk. On a
    /// miss, returns `false` and leaves `*value` untouched.
    pub fn swap<Q>(&mut self, key: &Q, value: &mut V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        let hash = self.make_hash(key);
        match self.raw.find(hash, |k| k.borrow() == key) {
            Some(index) => {
                mem::swap(self.raw.value_mut(index), value);
                true
            }
            None => false,
        }
    }

    /// Exchange when present (the prior value comes back through
    /// `*value`); insert a clone of `*value` when absent, leaving `*value`
    /// untouched. Returns whether the key existed.
    pub fn insert_or_swap(&mut self, key: K, value: &mut V) -> bool
    where
        V: Clone,
    {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        let hash = self.make_hash(&key);
        match self.raw.find(hash, |k| *k == key) {
            Some(index) => {
                mem::swap(self.raw.value_mut(index), value);
                true
            }
            None => {
                let stored = value.clone();
                self.raw.insert_slot(hash, key, stored);
                false
            }
        }
    }

    /// Remove `key`'s entry. Returns whether one existed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take_entry(key).is_some()
    }

    /// Remove and return the value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take_entry(key).map(|(_, value)| value)
    }

    /// Remove and return the owned pair.
    pub fn take_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _token = self.reentry.enter();
        self.raw.bump_version();
        let hash = self.make_hash(key);
        self.raw.find_and_unlink(hash, |k| k.borrow() == key)
    }

    /// Remove and return the value, or `V::default()` on a miss.
    pub fn take_or_default<Q>(&mut self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Default,
    {
        self.take(key).unwrap_or_default()
    }
}

impl<K, V, S> Default for ArenaHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Clone for ArenaHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            raw: self.raw.clone(),
            reentry: ReentryCheck::new(),
        }
    }
}

impl<K, V, S> fmt::Debug for ArenaHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for ArenaHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| *v == *value))
    }
}

impl<K, V, S> Eq for ArenaHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for ArenaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > 0 {
            self.reserve(lower);
        }
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ArenaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S, Q> Index<&Q> for ArenaHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics when the key is absent; use [`ArenaHashMap::get`] for a
    /// non-panicking lookup.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
