//! Separate crossing stems into a main page and pseudoknots.
//!
//! Stems form the nodes of a conflict graph, two stems are connected if
//! their outermost pairs cross. In every connected component, the stem with
//! the most base pairs stays on the main page (first one on ties), all
//! other members are demoted to pseudoknots.
//!

use std::collections::VecDeque;
use nohash_hasher::IntMap;
use log::warn;

use crate::Stem;


/// The result of splitting stems into main page and pseudoknots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemPartition {
    clean: Vec<Stem>,
    knots: Vec<Stem>,
    groups: Vec<Vec<usize>>,
    warnings: Vec<String>,
}

impl StemPartition {
    /// Stems kept on the main page, in input order.
    pub fn clean(&self) -> &[Stem] {
        &self.clean
    }

    /// Demoted stems, in input order.
    pub fn knots(&self) -> &[Stem] {
        &self.knots
    }

    /// Demoted stems grouped by conflict component, in discovery order.
    pub fn knot_groups(&self) -> Vec<Vec<&Stem>> {
        self.groups.iter()
            .map(|group| group.iter().map(|&k| &self.knots[k]).collect())
            .collect()
    }

    /// One line per demoted stem.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Connected components of the conflict graph, each sorted, ordered by
/// their smallest member.
fn conflict_components(stems: &[Stem]) -> Vec<Vec<usize>> {
    let mut graph: IntMap<usize, Vec<usize>> = IntMap::default();
    for a in 0..stems.len() {
        for b in a + 1..stems.len() {
            if stems[a].crosses(&stems[b]) {
                graph.entry(a).or_default().push(b);
                graph.entry(b).or_default().push(a);
            }
        }
    }

    let mut seen = vec![false; stems.len()];
    let mut components = Vec::new();
    for root in 0..stems.len() {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut component = vec![root];
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            for &next in graph.get(&node).into_iter().flatten() {
                if !seen[next] {
                    seen[next] = true;
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Split `stems` into the main page and pseudoknots.
pub fn separate_stems(stems: &[Stem]) -> StemPartition {
    let mut demoted: Vec<Vec<usize>> = Vec::new();
    for component in conflict_components(stems) {
        if component.len() < 2 {
            continue;
        }
        // max_by_key returns the last maximum, we want the first.
        let keep = component.iter()
            .copied()
            .rev()
            .max_by_key(|&s| stems[s].len())
            .unwrap_or(component[0]);
        demoted.push(component.into_iter().filter(|&s| s != keep).collect());
    }

    let mut knot_idxs: Vec<usize> = demoted.iter().flatten().copied().collect();
    knot_idxs.sort_unstable();
    let rank: IntMap<usize, usize> = knot_idxs.iter()
        .enumerate()
        .map(|(k, &s)| (s, k))
        .collect();

    let mut warnings = Vec::new();
    for &s in &knot_idxs {
        let msg = format!("segment {} ({}) assigned to pseudoknot", s + 1, stems[s].outer());
        warn!("{msg}");
        warnings.push(msg);
    }

    StemPartition {
        clean: stems.iter()
            .enumerate()
            .filter(|(s, _)| !rank.contains_key(s))
            .map(|(_, stem)| stem.clone())
            .collect(),
        knots: knot_idxs.iter().map(|&s| stems[s].clone()).collect(),
        groups: demoted.iter()
            .map(|group| group.iter().map(|s| rank[s]).collect())
            .collect(),
        warnings,
    }
}
