//! Pair and PairMap definitions.
//!
//! A `PairMap` is the verified one-to-one pairing between positions of a
//! sequence, as produced by an input parser. Indices are **1-based**.
//!
//! Pairs are always stored in both directions (i -> j and j -> i), so a
//! partner lookup never depends on which side the upstream parser listed.
//! The map does not re-validate that pairs are disjoint, inserting a
//! position twice is a bug on the caller's side (checked in debug builds).
//!

use std::fmt;
use nohash_hasher::IntMap;

use crate::Bracket;
use crate::StructureError;
use crate::NAIDX;


/// A base pair (i, j) with i < j.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    i: NAIDX,
    j: NAIDX,
}

impl Pair {
    /// Create a new pair (i, j). Panics in debug if i >= j.
    pub fn new(i: NAIDX, j: NAIDX) -> Self {
        debug_assert!(0 < i && i < j);
        Pair { i, j }
    }

    /// Return the 5'-side index.
    pub fn i(&self) -> NAIDX {
        self.i
    }

    /// Return the 3'-side index.
    pub fn j(&self) -> NAIDX {
        self.j
    }

    /// True if the two pairs cannot be drawn on the same page.
    pub fn crosses(&self, other: &Pair) -> bool {
        let (i, j, k, l) = (self.i, self.j, other.i, other.j);
        (i < k && k < j && j < l) || (k < i && i < l && l < j)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.i, self.j)
    }
}

/// A symmetric pairing map over positions 1..=length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairMap {
    length: usize,
    partners: IntMap<NAIDX, NAIDX>,
}

impl PairMap {
    /// Create an empty pairing map for a given sequence length.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            partners: IntMap::default(),
        }
    }

    /// Insert a pair in both directions.
    pub fn insert(&mut self, pair: Pair) {
        debug_assert!((pair.j() as usize) <= self.length);
        debug_assert!(self.partners.get(&pair.i()).is_none_or(|&p| p == pair.j()));
        debug_assert!(self.partners.get(&pair.j()).is_none_or(|&p| p == pair.i()));
        self.partners.insert(pair.i(), pair.j());
        self.partners.insert(pair.j(), pair.i());
    }

    /// Number of base pairs.
    pub fn len(&self) -> usize {
        self.partners.len() / 2
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Underlying sequence length.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn partner(&self, pos: NAIDX) -> Option<NAIDX> {
        self.partners.get(&pos).copied()
    }

    pub fn is_paired(&self, pos: NAIDX) -> bool {
        self.partners.contains_key(&pos)
    }

    /// Iterator over all pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = Pair> + '_ {
        self.partners.iter()
            .filter(|&(&i, &j)| i < j)
            .map(|(&i, &j)| Pair::new(i, j))
    }

    /// Return all pairs sorted by their 5' position.
    pub fn to_vec(&self) -> Vec<Pair> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_unstable();
        v
    }

    /// The first and the last paired position, if any.
    pub fn extremes(&self) -> Option<(NAIDX, NAIDX)> {
        let first = self.partners.keys().min()?;
        let last = self.partners.keys().max()?;
        Some((*first, *last))
    }

    /// The next paired position after `pos`, ignoring positions for which
    /// `skip` returns true.
    pub fn next_paired(&self, pos: NAIDX, skip: impl Fn(NAIDX) -> bool) -> Option<NAIDX> {
        let (_, last) = self.extremes()?;
        (pos.saturating_add(1)..=last).find(|&n| self.is_paired(n) && !skip(n))
    }

    /// The previous paired position before `pos`, ignoring positions for
    /// which `skip` returns true.
    pub fn prev_paired(&self, pos: NAIDX, skip: impl Fn(NAIDX) -> bool) -> Option<NAIDX> {
        let (first, _) = self.extremes()?;
        (first..pos).rev().find(|&p| self.is_paired(p) && !skip(p))
    }

    /// A copy holding only the pairs for which `keep` returns true.
    pub fn retain_pairs(&self, keep: impl Fn(&Pair) -> bool) -> PairMap {
        let mut filtered = PairMap::new(self.length);
        for pair in self.iter().filter(|p| keep(p)) {
            filtered.insert(pair);
        }
        filtered
    }
}

impl FromIterator<Pair> for PairMap {
    /// Collect pairs; the length becomes the largest paired position.
    fn from_iter<T: IntoIterator<Item = Pair>>(iter: T) -> Self {
        let pairs: Vec<Pair> = iter.into_iter().collect();
        let length = pairs.iter().map(|p| p.j() as usize).max().unwrap_or(0);
        let mut map = PairMap::new(length);
        for pair in pairs {
            map.insert(pair);
        }
        map
    }
}

impl TryFrom<&str> for PairMap {
    type Error = StructureError;

    /// Parse a (multi-level) dot-bracket string.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut stacks: IntMap<usize, Vec<NAIDX>> = IntMap::default();
        let mut map = PairMap::new(s.chars().count());

        for (idx, c) in s.chars().enumerate() {
            let pos = idx as NAIDX + 1;
            match Bracket::try_from(c).map_err(|_| StructureError::InvalidToken(c, pos))? {
                Bracket::Unpaired => (),
                Bracket::Open(page) => stacks.entry(page).or_default().push(pos),
                Bracket::Close(page) => {
                    let i = stacks.get_mut(&page)
                        .and_then(|stack| stack.pop())
                        .ok_or(StructureError::UnmatchedClose(pos))?;
                    map.insert(Pair::new(i, pos));
                }
            }
        }

        if let Some(&i) = stacks.values().flatten().min() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(map)
    }
}

impl fmt::Display for PairMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pair in self.to_vec() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "({},{})", pair.i(), pair.j())?;
            first = false;
        }
        Ok(())
    }
}
