//! The full annotation pipeline.
//!
//!  1. extract stems from the pairing map,
//!  2. separate pseudoknot stems,
//!  3. filter pseudoknot pairs from the map,
//!  4. re-extract the main-page stems,
//!  5. encode the multi-level dot-bracket string,
//!  6. classify every position,
//!  7. collect the structure inventory.
//!
//! The segment graph is not part of the inventory, it is available on
//! demand through [`StructureMap::segment_graph`].
//!

use std::fmt;
use itertools::Itertools;
use log::debug;

use crate::classify;
use crate::encode;
use crate::extract_stems;
use crate::filter_knots;
use crate::separate_stems;
use crate::Annotation;
use crate::Classification;
use crate::KnotMask;
use crate::LoopType;
use crate::PairMap;
use crate::SegmentGraph;
use crate::Stem;
use crate::StructureError;


/// The inventory categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Loop(LoopType),
    Pseudoknot,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Loop(LoopType::Stem),
        Category::Loop(LoopType::Hairpin),
        Category::Loop(LoopType::Bulge),
        Category::Loop(LoopType::Interior),
        Category::Loop(LoopType::Multi),
        Category::Loop(LoopType::Exterior),
        Category::Loop(LoopType::Dangling),
        Category::Pseudoknot,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Category::Loop(LoopType::Stem) => "S",
            Category::Loop(LoopType::Hairpin) => "H",
            Category::Loop(LoopType::Bulge) => "B",
            Category::Loop(LoopType::Interior) => "I",
            Category::Loop(LoopType::Multi) => "M",
            Category::Loop(LoopType::Exterior) => "X",
            Category::Loop(LoopType::Dangling) => "E",
            Category::Pseudoknot => "PK",
        }
    }

    fn index(&self) -> usize {
        match self {
            Category::Loop(lt) => *lt as usize,
            Category::Pseudoknot => LoopType::ALL.len(),
        }
    }
}

impl From<LoopType> for Category {
    fn from(lt: LoopType) -> Self {
        Category::Loop(lt)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Descriptor lines for every category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    entries: [Vec<String>; 8],
}

impl Inventory {
    pub fn get(&self, category: Category) -> &[String] {
        &self.entries[category.index()]
    }

    /// All categories in report order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    fn push(&mut self, category: Category, descriptor: String) {
        self.entries[category.index()].push(descriptor);
    }

    /// `S1 1-10,2-9` style descriptors for a list of stems.
    fn add_stems(&mut self, category: Category, stems: &[Stem]) {
        for (n, stem) in stems.iter().enumerate() {
            self.push(category, format!("{}{} {}", category, n + 1, stem));
        }
    }

    /// `H1 5..6 "AG"` style descriptors for maximal runs of loop classes.
    fn add_regions(&mut self, sequence: &str, classes: &[LoopType]) {
        let mut counters = [0usize; 7];
        let mut start = 0;
        for (lt, run) in &classes.iter().chunk_by(|&&lt| lt) {
            let len = run.count();
            if lt != LoopType::Stem {
                counters[lt as usize] += 1;
                let (a, b) = (start + 1, start + len);
                let sub = sequence.get(start..start + len).unwrap_or_default();
                self.push(lt.into(), format!("{}{} {}..{} \"{}\"", lt, counters[lt as usize], a, b, sub));
            }
            start += len;
        }
    }
}

/// A fully annotated structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMap {
    sequence: String,
    main_pairs: PairMap,
    stems: Vec<Stem>,
    knots: Vec<Stem>,
    annotation: Annotation,
    classification: Classification,
    inventory: Inventory,
    warnings: Vec<String>,
}

impl TryFrom<(&str, &PairMap)> for StructureMap {
    type Error = StructureError;

    fn try_from((sequence, pairs): (&str, &PairMap)) -> Result<Self, Self::Error> {
        let length = sequence.chars().count();
        if length != pairs.length() {
            return Err(StructureError::LengthMismatch { sequence: length, pairs: pairs.length() });
        }

        let all_stems = extract_stems(pairs, &KnotMask::default())?;
        let partition = separate_stems(&all_stems);
        let mask: KnotMask = partition.knots().iter().collect();
        let main_pairs = filter_knots(pairs, &mask);
        let stems = extract_stems(&main_pairs, &KnotMask::default())?;
        debug!("{} stems, {} on the main page after removing {} pseudoknots.",
            all_stems.len(), stems.len(), partition.knots().len());

        let annotation = encode(length, &stems, &partition.knot_groups())?;
        let classification = classify(&annotation, &main_pairs);

        let mut inventory = Inventory::default();
        inventory.add_stems(LoopType::Stem.into(), &stems);
        inventory.add_regions(sequence, classification.classes());
        inventory.add_stems(Category::Pseudoknot, partition.knots());

        Ok(StructureMap {
            sequence: sequence.to_string(),
            main_pairs,
            stems,
            knots: partition.knots().to_vec(),
            annotation,
            classification,
            inventory,
            warnings: partition.warnings().to_vec(),
        })
    }
}

impl StructureMap {
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.annotation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotation.is_empty()
    }

    /// The main-page pairs, i.e. the input without pseudoknot pairs.
    pub fn main_pairs(&self) -> &PairMap {
        &self.main_pairs
    }

    /// Main-page stems.
    pub fn stems(&self) -> &[Stem] {
        &self.stems
    }

    /// Pseudoknot stems.
    pub fn knots(&self) -> &[Stem] {
        &self.knots
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn pages(&self) -> usize {
        self.annotation.pages()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The adjacency graph between main-page stems.
    pub fn segment_graph(&self) -> SegmentGraph {
        let mask: KnotMask = self.knots.iter().collect();
        SegmentGraph::new(&self.main_pairs, &self.stems, &mask)
    }
}
