//! Per-position loop classification of an annotation string.
//!
//! Paired positions are stems (S). Every unpaired position is typed by its
//! nearest bracket on either side (`bwd` to the 5' side, `fwd` to the 3'
//! side):
//!
//! | bwd     | fwd     | type                          |
//! |---------|---------|-------------------------------|
//! | opener  | opener  | bulge, else interior/exterior |
//! | opener  | closer  | hairpin                       |
//! | closer  | opener  | exterior                      |
//! | closer  | closer  | bulge, else interior/exterior |
//! | any     | none    | dangling end                  |
//! | none    | any     | dangling end                  |
//!
//! Finally, stem positions in junctions of more than two bracketed
//! positions are promoted to multiloop (M).
//!

use std::fmt;
use std::collections::VecDeque;
use nohash_hasher::IntMap;
use nohash_hasher::IntSet;

use crate::Annotation;
use crate::Bracket;
use crate::PairMap;
use crate::NAIDX;


/// Structural class of a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoopType {
    Stem,
    Hairpin,
    Bulge,
    Interior,
    Multi,
    Exterior,
    Dangling,
}

impl LoopType {
    pub const ALL: [LoopType; 7] = [
        LoopType::Stem,
        LoopType::Hairpin,
        LoopType::Bulge,
        LoopType::Interior,
        LoopType::Multi,
        LoopType::Exterior,
        LoopType::Dangling,
    ];

    /// The one-letter tag.
    pub fn tag(&self) -> char {
        match self {
            LoopType::Stem => 'S',
            LoopType::Hairpin => 'H',
            LoopType::Bulge => 'B',
            LoopType::Interior => 'I',
            LoopType::Multi => 'M',
            LoopType::Exterior => 'X',
            LoopType::Dangling => 'E',
        }
    }
}

impl fmt::Display for LoopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Loop types and pseudoknot flags for every position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    classes: Vec<LoopType>,
    knotted: Vec<bool>,
}

impl Classification {
    pub fn classes(&self) -> &[LoopType] {
        &self.classes
    }

    pub fn knotted(&self) -> &[bool] {
        &self.knotted
    }

    /// The class of a 1-based position.
    pub fn class(&self, pos: NAIDX) -> LoopType {
        self.classes[pos as usize - 1]
    }

    /// One tag per position, e.g. `SSSSHHSSSS`.
    pub fn class_string(&self) -> String {
        self.classes.iter().map(LoopType::tag).collect()
    }

    /// `K` for pseudoknotted positions, `N` otherwise.
    pub fn knot_string(&self) -> String {
        self.knotted.iter().map(|&k| if k { 'K' } else { 'N' }).collect()
    }
}

/// Classify every position of `annotation`.
///
/// `pairs` is the main-page pairing map, it provides the edges of the
/// junction graph used for multiloop promotion.
pub fn classify(annotation: &Annotation, pairs: &PairMap) -> Classification {
    let brackets = annotation.brackets();
    let n = brackets.len();
    let mut classes: Vec<Option<LoopType>> = vec![None; n];
    let knotted: Vec<bool> = brackets.iter().map(Bracket::is_knot).collect();

    for (idx, b) in brackets.iter().enumerate() {
        if b.is_paired() {
            classes[idx] = Some(LoopType::Stem);
        }
    }

    let partner = |idx: usize| {
        annotation.pairs().partner(idx as NAIDX + 1).map(|p| p as usize - 1)
    };
    // Shortcut, or look between the partners of the flanking brackets.
    let bulge_or_between = |bwd: usize, fwd: usize| {
        match (partner(bwd), partner(fwd)) {
            (Some(pb), Some(pf)) if pf + 1 == pb => LoopType::Bulge,
            (Some(pb), Some(pf)) => {
                let (lo, hi) = (pb.min(pf), pb.max(pf));
                if brackets[lo + 1..hi].iter().any(Bracket::is_paired) {
                    LoopType::Exterior
                } else {
                    LoopType::Interior
                }
            }
            _ => LoopType::Interior,
        }
    };

    use Bracket::*;
    for idx in 0..n {
        if classes[idx].is_some() {
            continue;
        }
        let fwd = (idx..n).find(|&f| brackets[f].is_paired()).map(|f| (f, brackets[f]));
        let bwd = (0..idx).rev().find(|&b| brackets[b].is_paired()).map(|b| (b, brackets[b]));

        classes[idx] = Some(match (bwd, fwd) {
            (Some((b, Open(_))), Some((f, Open(_)))) => bulge_or_between(b, f),
            (Some((_, Open(_))), Some((_, Close(_)))) => LoopType::Hairpin,
            (Some((_, Close(_))), Some((_, Open(_)))) => LoopType::Exterior,
            (Some((b, Close(_))), Some((f, Close(_)))) => bulge_or_between(b, f),
            _ => LoopType::Dangling,
        });
    }

    let mut classes: Vec<LoopType> = classes.into_iter()
        .map(|c| c.unwrap_or(LoopType::Dangling))
        .collect();

    let nodes: Vec<usize> = (0..n).filter(|&i| brackets[i].is_paired()).collect();
    let edges = pairs.iter().map(|p| (p.i() as usize - 1, p.j() as usize - 1));
    promote_junctions(&mut classes, &nodes, edges);

    Classification { classes, knotted }
}

/// Relabel S as M in every connected component with more than two nodes.
fn promote_junctions(
    classes: &mut [LoopType],
    nodes: &[usize],
    edges: impl IntoIterator<Item = (usize, usize)>,
) {
    let mut graph: IntMap<usize, Vec<usize>> = nodes.iter().map(|&v| (v, Vec::new())).collect();
    for (a, b) in edges {
        graph.entry(a).or_default().push(b);
        graph.entry(b).or_default().push(a);
    }

    let mut seen: IntSet<usize> = IntSet::default();
    let mut roots: Vec<usize> = graph.keys().copied().collect();
    roots.sort_unstable();
    for root in roots {
        if !seen.insert(root) {
            continue;
        }
        let mut component = vec![root];
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            for &next in &graph[&node] {
                if seen.insert(next) {
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        if component.len() > 2 {
            for v in component {
                if classes[v] == LoopType::Stem {
                    classes[v] = LoopType::Multi;
                }
            }
        }
    }
}
