//! Adjacency between stems on the main page.
//!
//! For a stem A we look up the next paired position after its outer 3'
//! end, and the next paired position after its inner 5' end. Whenever one
//! of those positions is the outer 5' end or the inner 3' end of a stem B,
//! we record a directed edge A -> B. Self-edges are common (every hairpin
//! closes A onto itself), parallel edges are allowed.
//!

use std::fmt;
use nohash_hasher::IntMap;

use crate::KnotMask;
use crate::PairMap;
use crate::Stem;
use crate::NAIDX;


/// Which neighbor of A met which end of B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjacency {
    /// After A's outer 3' end comes B's outer 5' end.
    OuterToOuter,
    /// After A's outer 3' end comes B's inner 3' end.
    OuterToInner,
    /// After A's inner 5' end comes B's outer 5' end.
    InnerToOuter,
    /// After A's inner 5' end comes B's inner 3' end.
    InnerToInner,
}

impl Adjacency {
    /// Numeric label, 1 to 4.
    pub fn label(&self) -> u8 {
        match self {
            Adjacency::OuterToOuter => 1,
            Adjacency::OuterToInner => 2,
            Adjacency::InnerToOuter => 3,
            Adjacency::InnerToInner => 4,
        }
    }
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A directed edge between two stems (0-based stem indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentEdge {
    pub from: usize,
    pub to: usize,
    /// The neighbor position found next to `from`.
    pub neighbor: NAIDX,
    /// The end of `to` that it matched.
    pub endpoint: NAIDX,
    pub kind: Adjacency,
}

impl fmt::Display for SegmentEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {} {}", self.from + 1, self.to + 1, self.neighbor, self.endpoint, self.kind)
    }
}

/// Directed multigraph over stem indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentGraph {
    nodes: usize,
    edges: Vec<SegmentEdge>,
    outgoing: IntMap<usize, Vec<usize>>,
}

impl SegmentGraph {
    /// Build the graph for `stems`, searching neighbors in `pairs` while
    /// ignoring positions in `knots`.
    pub fn new(pairs: &PairMap, stems: &[Stem], knots: &KnotMask) -> Self {
        let skip = |pos: NAIDX| knots.contains(pos);
        let mut graph = SegmentGraph {
            nodes: stems.len(),
            ..Default::default()
        };

        for (a, sa) in stems.iter().enumerate() {
            let after_outer = pairs.next_paired(sa.outer().j(), skip);
            let after_inner = pairs.next_paired(sa.inner().i(), skip);
            for (b, sb) in stems.iter().enumerate() {
                let (outer_5p, inner_3p) = (sb.outer().i(), sb.inner().j());
                let candidates = [
                    (after_outer, outer_5p, Adjacency::OuterToOuter),
                    (after_outer, inner_3p, Adjacency::OuterToInner),
                    (after_inner, outer_5p, Adjacency::InnerToOuter),
                    (after_inner, inner_3p, Adjacency::InnerToInner),
                ];
                for (neighbor, endpoint, kind) in candidates {
                    if neighbor == Some(endpoint) {
                        graph.add_edge(SegmentEdge { from: a, to: b, neighbor: endpoint, endpoint, kind });
                    }
                }
            }
        }
        graph
    }

    fn add_edge(&mut self, edge: SegmentEdge) {
        self.outgoing.entry(edge.from).or_default().push(self.edges.len());
        self.edges.push(edge);
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[SegmentEdge] {
        &self.edges
    }

    /// Targets of the edges leaving `node`, with repetitions.
    pub fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing.get(&node)
            .into_iter()
            .flatten()
            .map(|&e| self.edges[e].to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_stems;

    fn graph_of(db: &str) -> SegmentGraph {
        let pm = PairMap::try_from(db).unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        SegmentGraph::new(&pm, &stems, &KnotMask::default())
    }

    #[test]
    fn test_single_hairpin_closes_on_itself() {
        let g = graph_of("((((..))))");
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edges(), &[SegmentEdge {
            from: 0, to: 0, neighbor: 7, endpoint: 7, kind: Adjacency::InnerToInner,
        }]);
    }

    #[test]
    fn test_sibling_stems() {
        let g = graph_of("((..))..((..))");
        let edges: Vec<String> = g.edges().iter().map(|e| e.to_string()).collect();
        assert_eq!(edges, vec!["1 1 5 5 4", "1 2 9 9 1", "2 2 13 13 4"]);
        assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(g.successors(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_nested_branches() {
        // Outer stem 1 encloses stems 2 and 3.
        let g = graph_of("((.((..))((..)).))");
        let kinds: Vec<(usize, usize, Adjacency)> = g.edges().iter()
            .map(|e| (e.from, e.to, e.kind))
            .collect();
        assert_eq!(kinds, vec![
            (0, 1, Adjacency::InnerToOuter),
            (1, 1, Adjacency::InnerToInner),
            (1, 2, Adjacency::OuterToOuter),
            (2, 0, Adjacency::OuterToInner),
            (2, 2, Adjacency::InnerToInner),
        ]);
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn test_knot_positions_are_ignored() {
        let pm = PairMap::try_from("((..))[[..((..]]..))").unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        assert_eq!(stems.len(), 3);
        let knots: KnotMask = stems[1..2].iter().collect();
        let main = vec![stems[0].clone(), stems[2].clone()];
        let g = SegmentGraph::new(&pm, &main, &knots);
        // Without the mask, stem 1 would be followed by the knot at 7.
        assert!(g.edges().iter().any(|e| e.from == 0 && e.to == 1 && e.kind == Adjacency::OuterToOuter));
    }
}
