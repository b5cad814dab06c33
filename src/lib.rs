//! arena-hashmap: a single-threaded open-hashing map built on an index
//! arena, with explicit control over storage layout.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map whose storage behavior is fully predictable (no hidden
//!   allocator traffic, growth only along a precomputed ladder, and
//!   explicit compaction/shrink hooks), built in layers that can be
//!   reasoned about independently.
//! - Layers:
//!   - `raw::RawMap<K, V>`: structural core owning the bucket table and
//!     the slot arena (free-list recycling, ladder growth, defragment,
//!     trim). Works on pre-folded hashes and never invokes user code
//!     once the structure is consistent.
//!   - `ArenaHashMap<K, V, S>`: hasher-specialized public surface; all
//!     operation families compile to direct calls when `S` is statically
//!     known.
//!   - `MapOps<K, V>`: object-safe contract over the same engine for
//!     callers that need to erase the hasher type (one virtual call per
//!     operation, nothing else).
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no atomics, no locks);
//!   at most one logical writer, enforced for safe callers by `&mut`.
//! - No per-entry heap allocations: entries live in one arena `Vec`,
//!   chains and the free list are `u32` indices threaded through slots.
//! - Capacity follows a prime ladder ending at [`MAX_CAPACITY`];
//!   inserting past it panics, leaving the map untouched.
//! - Each entry stores its folded hash; growth, shrink, and
//!   defragmentation rebuild chains from stored hashes and never re-run
//!   `Hash`.
//!
//! Mutation and enumeration
//! - Every mutating operation bumps an internal version exactly once on
//!   entry, even when its net effect is nothing (a removal of an absent
//!   key cannot know that in advance). Detached cursors ([`Cursor`],
//!   [`KeyCursor`], [`ValueCursor`]) snapshot the version and fault on a
//!   stale advance when checks are active. Borrowing iterators need no
//!   stamp: the borrow rules already exclude mutation while they live.
//! - [`KeyView`]/[`ValueView`] copy nothing and observe mutations live;
//!   view equality is identity of the underlying map.
//!
//! Consistency checks
//! - Active in debug builds, forced into release builds by the `checked`
//!   cargo feature, compiled out otherwise. They cover: re-entering the
//!   map from a key's `Eq`/`Hash` during a chain walk, advancing a stale
//!   cursor, and advancing an exhausted cursor without a reset.
//!
//! Notes and non-goals
//! - Unordered: iteration order is slot-occupancy order, an artifact of
//!   the insert/remove history, not a contract.
//! - No persistence or wire format; this is an in-process structure.
//! - Public surface is `ArenaHashMap`, `MapOps`, the iterators, views,
//!   cursors, and `InsertError`; `raw` and `ladder` are implementation
//!   details.

mod cursor;
mod guard;
mod ladder;
mod map;
mod map_proptest;
mod ops;
mod raw;
mod view;

pub use cursor::{Cursor, KeyCursor, ValueCursor};
pub use ladder::MAX_CAPACITY;
pub use map::{ArenaHashMap, InsertError};
pub use ops::MapOps;
pub use view::{IntoIter, Iter, IterMut, KeyView, Keys, ValueView, Values};

/// Default build hasher for maps constructed without an explicit one.
pub use hashbrown::hash_map::DefaultHashBuilder;
