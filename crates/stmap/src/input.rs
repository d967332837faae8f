//! Detect and read BPSEQ and dot-bracket files.
//!
//! Both readers return the sequence and a symmetric `PairMap`. All
//! consistency checks on the pairing happen here, the annotation core
//! trusts its input.
//!

use std::path::Path;
use log::debug;

use sm_structure::Pair;
use sm_structure::PairMap;
use sm_structure::StructureError;
use sm_structure::NAIDX;


#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("Line {line}: expected 3 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("Line {line}: '{value}' is not a valid position")]
    InvalidNumber { line: usize, value: String },

    #[error("Line {line}: expected position {expected}, found {found}")]
    OutOfOrder { line: usize, expected: usize, found: usize },

    #[error("Line {line}: position {pos} is paired with itself")]
    SelfPair { line: usize, pos: NAIDX },

    #[error("Inconsistent pairing at {pos},{partner}")]
    Inconsistent { pos: NAIDX, partner: NAIDX },

    #[error("Position {pos} is paired with {partner}, beyond the sequence length {length}")]
    OutOfRange { pos: NAIDX, partner: NAIDX, length: usize },

    #[error("Dot-bracket file needs a sequence and a structure line")]
    MissingLines,

    #[error("Sequence length {sequence} does not match structure length {structure}")]
    LengthMismatch { sequence: usize, structure: usize },

    #[error("Unknown format, expected BPSEQ or dot-bracket")]
    UnknownFormat,

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Bpseq,
    DotBracket,
}

/// Non-comment, non-blank lines together with their 1-based line numbers.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(n, l)| (n + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

impl InputFormat {
    /// Guess the format from the file content. BPSEQ is tested first.
    pub fn detect(text: &str) -> Option<Self> {
        let lines: Vec<&str> = content_lines(text).map(|(_, l)| l).collect();
        if lines.is_empty() {
            return None;
        }
        if lines.iter().all(|l| l.split_whitespace().count() == 3) {
            return Some(InputFormat::Bpseq);
        }
        let fits = match lines.as_slice() {
            [seq, db] => Some((seq, db)),
            [header, seq, db] if header.starts_with('>') => Some((seq, db)),
            _ => None,
        };
        fits.filter(|(seq, db)| {
            db.split_whitespace().next().map(|d| d.chars().count()) == Some(seq.chars().count())
        }).map(|_| InputFormat::DotBracket)
    }
}

/// A parsed input: a name (from the header, if any), the sequence and
/// its pairing map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: Option<String>,
    pub sequence: String,
    pub pairs: PairMap,
}

/// Read columns `index base partner`, partner 0 means unpaired.
pub fn read_bpseq(text: &str) -> Result<Record, InputError> {
    let mut sequence = String::new();
    let mut partners: Vec<Option<NAIDX>> = Vec::new();

    for (line, content) in content_lines(text) {
        let cols: Vec<&str> = content.split_whitespace().collect();
        let &[idx, base, partner] = cols.as_slice() else {
            return Err(InputError::ColumnCount { line, found: cols.len() });
        };
        let number = |value: &str| value.parse::<NAIDX>()
            .map_err(|_| InputError::InvalidNumber { line, value: value.to_string() });
        let (i, j) = (number(idx)?, number(partner)?);

        let expected = partners.len() + 1;
        if i as usize != expected {
            return Err(InputError::OutOfOrder { line, expected, found: i as usize });
        }
        if i == j {
            return Err(InputError::SelfPair { line, pos: i });
        }
        sequence.push_str(base);
        partners.push((j > 0).then_some(j));
    }

    let length = partners.len();
    let mut pairs = PairMap::new(length);
    for (idx, &partner) in partners.iter().enumerate() {
        let i = idx as NAIDX + 1;
        let Some(j) = partner else { continue };
        if j as usize > length {
            return Err(InputError::OutOfRange { pos: i, partner: j, length });
        }
        // Listed from one side only, or from both sides in agreement.
        let back = partners[j as usize - 1];
        let claimed = pairs.partner(j);
        if back.is_some_and(|b| b != i) || claimed.is_some_and(|c| c != i) {
            return Err(InputError::Inconsistent { pos: i, partner: j });
        }
        if claimed.is_none() {
            pairs.insert(Pair::new(i.min(j), i.max(j)));
        }
    }
    debug!("Read BPSEQ with {} positions and {} pairs.", length, pairs.len());
    Ok(Record { name: None, sequence, pairs })
}

/// Read an optional `>name` header, a sequence and a structure line.
pub fn read_dotbracket(text: &str) -> Result<Record, InputError> {
    let lines: Vec<&str> = content_lines(text).map(|(_, l)| l).collect();
    let (name, sequence, structure) = match lines.as_slice() {
        [seq, db] => (None, *seq, *db),
        [header, seq, db] if header.starts_with('>') => {
            (Some(header[1..].trim().to_string()), *seq, *db)
        }
        _ => return Err(InputError::MissingLines),
    };
    // The structure line may carry an energy annotation after the brackets.
    let structure = structure.split_whitespace().next().unwrap_or_default();
    let (s, d) = (sequence.chars().count(), structure.chars().count());
    if s != d {
        return Err(InputError::LengthMismatch { sequence: s, structure: d });
    }
    let pairs = PairMap::try_from(structure)?;
    debug!("Read dot-bracket with {} positions and {} pairs.", s, pairs.len());
    Ok(Record { name, sequence: sequence.to_string(), pairs })
}

/// Detect the format of `text` and parse it.
pub fn read_structure(text: &str) -> Result<Record, InputError> {
    match InputFormat::detect(text) {
        Some(InputFormat::Bpseq) => read_bpseq(text),
        Some(InputFormat::DotBracket) => read_dotbracket(text),
        None => Err(InputError::UnknownFormat),
    }
}

/// Read and parse a file.
pub fn read_file(path: &Path) -> Result<Record, InputError> {
    let text = std::fs::read_to_string(path)?;
    read_structure(&text)
}
