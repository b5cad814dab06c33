//! Detached cursors: value-type enumeration tokens.
//!
//! A cursor borrows nothing: it is plain data (position, touched-mark
//! snapshot, version stamp) advanced by handing it the map on every step.
//! That makes the invalidation contract observable: any mutating map
//! operation bumps the version, and a cursor whose stamp no longer matches
//! faults on its next advance when checks are active (debug builds or the
//! `checked` cargo feature). Without checks a stale cursor
//! degrades to scanning whatever slots currently exist, never past the
//! arena. Cursors restart only via [`reset`](Cursor::reset).
//!
//! Use each cursor with the map that created it; the stamp is not a brand.

use crate::guard::checks_enabled;
use crate::map::ArenaHashMap;
use crate::raw::RawMap;

#[derive(Clone, Copy, Debug)]
struct CursorCore {
    at: u32,
    touched: u32,
    version: u64,
    exhausted: bool,
}

impl CursorCore {
    fn new<K, V>(raw: &RawMap<K, V>) -> Self {
        Self {
            at: 0,
            touched: raw.touched() as u32,
            version: raw.version(),
            exhausted: false,
        }
    }

    fn advance<'m, K, V>(&mut self, raw: &'m RawMap<K, V>) -> Option<(&'m K, &'m V)> {
        if checks_enabled() {
            assert!(
                self.version == raw.version(),
                "cursor invalidated: the map was mutated after the cursor was created"
            );
            assert!(!self.exhausted, "cursor used after exhaustion; reset it first");
        }
        let bound = (self.touched as usize).min(raw.touched());
        while (self.at as usize) < bound {
            let index = self.at as usize;
            self.at += 1;
            if let Some(pair) = raw.occupied_at(index) {
                return Some(pair);
            }
        }
        self.exhausted = true;
        None
    }

    fn reset(&mut self) {
        self.at = 0;
        self.exhausted = false;
    }
}

/// All-pairs cursor. Obtain via [`ArenaHashMap::cursor`].
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    core: CursorCore,
}

impl Cursor {
    pub(crate) fn new<K, V>(raw: &RawMap<K, V>) -> Self {
        Self {
            core: CursorCore::new(raw),
        }
    }

    /// Advance to the next occupied slot of `map`.
    pub fn next<'m, K, V, S>(&mut self, map: &'m ArenaHashMap<K, V, S>) -> Option<(&'m K, &'m V)> {
        self.core.advance(&map.raw)
    }

    /// Rewind to before the first entry. Does not refresh the version
    /// stamp: a cursor invalidated by a mutation stays invalid.
    pub fn reset(&mut self) {
        self.core.reset();
    }
}

/// Keys-only cursor. Obtain via [`ArenaHashMap::key_cursor`].
#[derive(Clone, Copy, Debug)]
pub struct KeyCursor {
    core: CursorCore,
}

impl KeyCursor {
    pub(crate) fn new<K, V>(raw: &RawMap<K, V>) -> Self {
        Self {
            core: CursorCore::new(raw),
        }
    }

    pub fn next<'m, K, V, S>(&mut self, map: &'m ArenaHashMap<K, V, S>) -> Option<&'m K> {
        self.core.advance(&map.raw).map(|(key, _)| key)
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }
}

/// Values-only cursor. Obtain via [`ArenaHashMap::value_cursor`].
#[derive(Clone, Copy, Debug)]
pub struct ValueCursor {
    core: CursorCore,
}

impl ValueCursor {
    pub(crate) fn new<K, V>(raw: &RawMap<K, V>) -> Self {
        Self {
            core: CursorCore::new(raw),
        }
    }

    pub fn next<'m, K, V, S>(&mut self, map: &'m ArenaHashMap<K, V, S>) -> Option<&'m V> {
        self.core.advance(&map.raw).map(|(_, value)| value)
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }
}
