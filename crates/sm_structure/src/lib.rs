//! The sm_structure crate.
//!
//! Turns a base-pairing map into a structural annotation:
//!  - stems (helical segments) extracted from the pairing map,
//!  - pseudoknot stems separated onto extra bracket pages,
//!  - a multi-level dot-bracket string,
//!  - a per-position loop classification (S, H, B, I, M, X, E),
//!  - an adjacency graph between stems.
//!
//! All positions are **1-based**, as in BPSEQ files.
//!

mod error;
mod pair_map;
mod segments;
mod pseudoknots;
mod dotbracket;
mod loop_types;
mod segment_graph;
mod structure_map;

pub use error::*;
pub use pair_map::*;
pub use segments::*;
pub use pseudoknots::*;
pub use dotbracket::*;
pub use loop_types::*;
pub use segment_graph::*;
pub use structure_map::*;


/// Nucleic Acid INdeX: 1-based sequence positions. We use `u32`, pairing
/// maps of real molecules stay far below that. Position `0` never occurs
/// in a `PairMap` and is used as "before the first position" by scans.
pub type NAIDX = u32;

