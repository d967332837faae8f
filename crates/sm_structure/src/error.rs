use crate::NAIDX;

/// Errors raised while building or annotating a structure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// The pairing map has no base pairs, there is nothing to segment.
    #[error("Empty structure: no base pairs found")]
    EmptyStructure,

    /// More pseudoknot levels are needed than the bracket alphabet has.
    #[error("Too many pseudoknot levels (more than {limit}) to represent")]
    TooManyPseudoknotLevels { limit: usize },

    /// Sequence and pairing map disagree on the number of positions.
    #[error("Sequence length {sequence} does not match pairing map length {pairs}")]
    LengthMismatch { sequence: usize, pairs: usize },

    #[error("Unmatched opening bracket at position {0}")]
    UnmatchedOpen(NAIDX),

    #[error("Unmatched closing bracket at position {0}")]
    UnmatchedClose(NAIDX),

    #[error("Invalid token '{0}' at position {1}")]
    InvalidToken(char, NAIDX),
}
