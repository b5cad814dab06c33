//! Capacity ladder: the precomputed size tiers used for growth and shrink.
//!
//! Each rung pairs a bucket count with an entry capacity. Bucket counts are
//! primes that roughly triple from rung to rung, so bucket indexing can use
//! plain modulo without ever degenerating on power-of-two-striped hashes,
//! and growth reaches any requested size in O(log n) rehashes. The table is
//! precomputed so no prime search happens at runtime and every index stays
//! within 31 bits.

/// One size tier: bucket-table width and entry-arena capacity.
///
/// Both currently share the rung prime (a chained table at load factor
/// <= 1.0); they are kept as a pair so the two could diverge without
/// touching any selection logic.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rung {
    pub buckets: u32,
    pub entries: u32,
}

const fn rung(prime: u32) -> Rung {
    Rung {
        buckets: prime,
        entries: prime,
    }
}

/// The most entries any map can hold. Inserting past this panics.
pub const MAX_CAPACITY: usize = 881_646_013;

/// Primes tripling from 17, capped by the [`MAX_CAPACITY`] rung.
pub(crate) static LADDER: [Rung; 18] = [
    rung(17),
    rung(53),
    rung(163),
    rung(491),
    rung(1_481),
    rung(4_447),
    rung(13_367),
    rung(40_111),
    rung(120_349),
    rung(361_069),
    rung(1_083_211),
    rung(3_249_641),
    rung(9_748_927),
    rung(29_246_797),
    rung(87_740_407),
    rung(263_221_229),
    rung(789_663_709),
    rung(881_646_013),
];

/// Index of the first rung whose entry capacity holds `min_entries`, or
/// `None` when the ladder is exhausted.
pub(crate) fn rung_for(min_entries: usize) -> Option<usize> {
    LADDER
        .iter()
        .position(|r| r.entries as usize >= min_entries)
}
