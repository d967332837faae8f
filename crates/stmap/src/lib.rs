//! # stmap
//!
//! Annotate RNA secondary structures read from BPSEQ or dot-bracket files:
//! stems, loops, and pseudoknots on multiple bracket pages.
//!
//! This crate provides the file adapters around the annotation core.

pub mod input;
pub mod output;

pub mod structure {
    pub use ::sm_structure::*;
}
