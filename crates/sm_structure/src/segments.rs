//! Stems (helical segments) and their extraction from a `PairMap`.
//!
//! A stem is read from its outermost pair inwards: (i1,j1), (i2,j2), ...
//! with i1 < i2 < ... and j1 > j2 > .... Consecutive pairs of a stem are
//! neighbors among the paired positions, unpaired positions in between
//! (bulges, interior loop bases) do not interrupt a stem.
//!

use std::fmt;
use itertools::Itertools;
use nohash_hasher::IntSet;

use crate::Pair;
use crate::PairMap;
use crate::StructureError;
use crate::NAIDX;


/// An ordered, nested run of base pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stem(Vec<Pair>);

impl Stem {
    /// Panics in debug if the pairs are not nested from outside in.
    pub fn new(pairs: Vec<Pair>) -> Self {
        debug_assert!(!pairs.is_empty());
        debug_assert!(pairs.windows(2).all(|w| w[0].i() < w[1].i() && w[0].j() > w[1].j()));
        Stem(pairs)
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.0
    }

    /// Number of base pairs in the stem.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The outermost (closing) pair.
    pub fn outer(&self) -> Pair {
        self.0[0]
    }

    /// The innermost pair.
    pub fn inner(&self) -> Pair {
        self.0[self.0.len() - 1]
    }

    /// Two stems cross if their outermost pairs cross.
    pub fn crosses(&self, other: &Stem) -> bool {
        self.outer().crosses(&other.outer())
    }

    /// The positions covered by the 5' strand and the 3' strand, including
    /// unpaired positions that interrupt either strand.
    pub fn strand_positions(&self) -> impl Iterator<Item = NAIDX> + '_ {
        let (outer, inner) = (self.outer(), self.inner());
        (outer.i()..=inner.i()).chain(inner.j()..=outer.j())
    }
}

impl From<Vec<Pair>> for Stem {
    fn from(pairs: Vec<Pair>) -> Self {
        Stem::new(pairs)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(","))
    }
}

/// The positions occupied by pseudoknot stems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnotMask(IntSet<NAIDX>);

impl KnotMask {
    pub fn contains(&self, pos: NAIDX) -> bool {
        self.0.contains(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a Stem> for KnotMask {
    fn from_iter<T: IntoIterator<Item = &'a Stem>>(knots: T) -> Self {
        KnotMask(knots.into_iter().flat_map(Stem::strand_positions).collect())
    }
}

/// Group the pairs of `pairs` into stems, scanning 5' to 3'.
///
/// Positions in `knots` are invisible to the scan. Fails if the map holds
/// no pairs at all.
pub fn extract_stems(pairs: &PairMap, knots: &KnotMask) -> Result<Vec<Stem>, StructureError> {
    if pairs.is_empty() {
        return Err(StructureError::EmptyStructure);
    }
    let skip = |pos: NAIDX| knots.contains(pos);

    let mut stems = Vec::new();
    let mut cursor = pairs.next_paired(0, skip);
    while let Some(seed) = cursor {
        let mut i = seed;
        if let Some(mut j) = pairs.partner(i).filter(|&j| i < j) {
            let mut stem = vec![Pair::new(i, j)];
            while let (Some(n), Some(p)) = (pairs.next_paired(i, skip), pairs.prev_paired(j, skip)) {
                if n < p && pairs.partner(n) == Some(p) {
                    stem.push(Pair::new(n, p));
                    (i, j) = (n, p);
                } else {
                    break;
                }
            }
            stems.push(Stem::new(stem));
        }
        cursor = pairs.next_paired(i, skip);
    }
    Ok(stems)
}

/// Remove every pair that touches a pseudoknot stem.
pub fn filter_knots(pairs: &PairMap, knots: &KnotMask) -> PairMap {
    pairs.retain_pairs(|p| !knots.contains(p.i()) && !knots.contains(p.j()))
}
