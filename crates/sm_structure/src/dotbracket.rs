//! Multi-level dot-bracket notation.
//!
//! Page 0 is the main (crossing-free) structure and uses `(` and `)`.
//! Every pseudoknot level gets its own page with a bracket pair from
//! `LEVEL_OPEN`/`LEVEL_CLOSE`: first `[]`, `{}`, `<>`, then `A`/`a` up to
//! `Z`/`z`.
//!

use std::fmt;
use log::debug;

use crate::Pair;
use crate::PairMap;
use crate::Stem;
use crate::StructureError;
use crate::NAIDX;


const LEVEL_OPEN: &[u8] = b"[{<ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LEVEL_CLOSE: &[u8] = b"]}>abcdefghijklmnopqrstuvwxyz";

/// Number of pseudoknot levels the bracket alphabet can represent.
pub const MAX_KNOT_LEVELS: usize = LEVEL_OPEN.len();

const _: () = {
    assert!(LEVEL_OPEN.len() == LEVEL_CLOSE.len());
};

/// One character of a multi-level dot-bracket string.
///
/// The `usize` is the page: 0 for the main structure, 1.. for pseudoknot
/// levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    Unpaired,
    Open(usize),
    Close(usize),
}

impl Bracket {
    pub fn is_paired(&self) -> bool {
        !matches!(self, Bracket::Unpaired)
    }

    /// True for brackets on any pseudoknot level.
    pub fn is_knot(&self) -> bool {
        matches!(self, Bracket::Open(p) | Bracket::Close(p) if *p > 0)
    }
}

impl TryFrom<char> for Bracket {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(Bracket::Unpaired),
            '(' => Ok(Bracket::Open(0)),
            ')' => Ok(Bracket::Close(0)),
            _ if c.is_ascii() => {
                let b = c as u8;
                if let Some(l) = LEVEL_OPEN.iter().position(|&o| o == b) {
                    Ok(Bracket::Open(l + 1))
                } else if let Some(l) = LEVEL_CLOSE.iter().position(|&o| o == b) {
                    Ok(Bracket::Close(l + 1))
                } else {
                    Err(c)
                }
            }
            _ => Err(c),
        }
    }
}

impl From<Bracket> for char {
    fn from(b: Bracket) -> Self {
        match b {
            Bracket::Unpaired => '.',
            Bracket::Open(0) => '(',
            Bracket::Close(0) => ')',
            Bracket::Open(p) => LEVEL_OPEN[p - 1] as char,
            Bracket::Close(p) => LEVEL_CLOSE[p - 1] as char,
        }
    }
}

/// The annotation string, together with every pair it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    brackets: Vec<Bracket>,
    pairs: PairMap,
    pages: usize,
}

impl Annotation {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// 1 + the number of pseudoknot levels in use.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// The bracket at a 1-based position.
    pub fn get(&self, pos: NAIDX) -> Option<Bracket> {
        (pos as usize).checked_sub(1).and_then(|i| self.brackets.get(i)).copied()
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// All encoded pairs, main page and pseudoknot levels.
    pub fn pairs(&self) -> &PairMap {
        &self.pairs
    }

    fn place(&mut self, stem: &Stem, page: usize) {
        for &pair in stem.pairs() {
            self.brackets[pair.i() as usize - 1] = Bracket::Open(page);
            self.brackets[pair.j() as usize - 1] = Bracket::Close(page);
            self.pairs.insert(pair);
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.brackets.iter().map(|&b| char::from(b)).collect();
        write!(f, "{s}")
    }
}

/// Encode the main-page stems and the pseudoknot groups.
///
/// Every group starts a new level. A stem joins the first level of its own
/// group that it does not cross, otherwise it opens another level.
pub fn encode(
    length: usize,
    main: &[Stem],
    knot_groups: &[Vec<&Stem>],
) -> Result<Annotation, StructureError> {
    let mut annotation = Annotation {
        brackets: vec![Bracket::Unpaired; length],
        pairs: PairMap::new(length),
        pages: 1,
    };
    for stem in main {
        annotation.place(stem, 0);
    }

    let mut levels: Vec<Vec<Pair>> = Vec::new();
    for group in knot_groups {
        let first = levels.len();
        for &stem in group {
            let slot = (first..levels.len())
                .find(|&l| levels[l].iter().all(|outer| !outer.crosses(&stem.outer())));
            let level = match slot {
                Some(l) => l,
                None if levels.len() < MAX_KNOT_LEVELS => {
                    levels.push(Vec::new());
                    levels.len() - 1
                }
                None => {
                    return Err(StructureError::TooManyPseudoknotLevels { limit: MAX_KNOT_LEVELS });
                }
            };
            levels[level].push(stem.outer());
            annotation.place(stem, level + 1);
        }
    }
    annotation.pages = 1 + levels.len();
    debug!("Encoded {} main stems on {} pages.", main.len(), annotation.pages);
    Ok(annotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_stems;
    use crate::KnotMask;

    #[test]
    fn test_bracket_chars() {
        assert_eq!(Bracket::try_from('('), Ok(Bracket::Open(0)));
        assert_eq!(Bracket::try_from(']'), Ok(Bracket::Close(1)));
        assert_eq!(Bracket::try_from('<'), Ok(Bracket::Open(3)));
        assert_eq!(Bracket::try_from('A'), Ok(Bracket::Open(4)));
        assert_eq!(Bracket::try_from('z'), Ok(Bracket::Close(MAX_KNOT_LEVELS)));
        assert_eq!(Bracket::try_from('x'), Ok(Bracket::Close(27)));
        assert_eq!(Bracket::try_from('?'), Err('?'));
        assert_eq!(Bracket::try_from('é'), Err('é'));
        for p in 0..=MAX_KNOT_LEVELS {
            for b in [Bracket::Open(p), Bracket::Close(p)] {
                assert_eq!(Bracket::try_from(char::from(b)), Ok(b));
            }
        }
        assert_eq!(MAX_KNOT_LEVELS, 29);
    }

    #[test]
    fn test_bracket_predicates() {
        assert!(!Bracket::Unpaired.is_paired());
        assert!(Bracket::Open(0).is_paired());
        assert!(!Bracket::Open(0).is_knot());
        assert!(Bracket::Close(2).is_knot());
    }

    #[test]
    fn test_encode_main_page() {
        let pm = PairMap::try_from("((((..))))").unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        let ann = encode(10, &stems, &[]).unwrap();
        assert_eq!(ann.to_string(), "((((..))))");
        assert_eq!(ann.pages(), 1);
        assert_eq!(ann.len(), 10);
        assert_eq!(ann.pairs(), &pm);
        assert_eq!(ann.get(1), Some(Bracket::Open(0)));
        assert_eq!(ann.get(0), None);
        assert_eq!(ann.get(11), None);
    }

    #[test]
    fn test_encode_levels_per_group() {
        let pm = PairMap::try_from("((..))..((..))..((..))").unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        let groups = vec![vec![&stems[1]], vec![&stems[2]]];
        let ann = encode(22, &stems[..1], &groups).unwrap();
        assert_eq!(ann.to_string(), "((..))..[[..]]..{{..}}");
        assert_eq!(ann.pages(), 3);
    }

    #[test]
    fn test_group_members_share_levels_unless_crossing() {
        let pm = PairMap::try_from("((..))..((..))..((..))").unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        let groups = vec![vec![&stems[1], &stems[2]]];
        let ann = encode(22, &stems[..1], &groups).unwrap();
        assert_eq!(ann.to_string(), "((..))..[[..]]..[[..]]");
        assert_eq!(ann.pages(), 2);

        let pm = PairMap::try_from("(((.[[.))).{{.]]..}}").unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        let groups = vec![vec![&stems[1], &stems[2]]];
        let ann = encode(20, &stems[..1], &groups).unwrap();
        assert_eq!(ann.to_string(), "(((.[[.))).{{.]]..}}");
        assert_eq!(ann.pages(), 3);
        assert_eq!(ann.pairs(), &pm);
    }

    #[test]
    fn test_alphabet_exhaustion() {
        let db = "(.)".repeat(MAX_KNOT_LEVELS + 2);
        let pm = PairMap::try_from(db.as_str()).unwrap();
        let stems = extract_stems(&pm, &KnotMask::default()).unwrap();
        let ok: Vec<Vec<&Stem>> = stems[1..=MAX_KNOT_LEVELS].iter().map(|s| vec![s]).collect();
        let ann = encode(db.len(), &stems[..1], &ok).unwrap();
        assert_eq!(ann.pages(), MAX_KNOT_LEVELS + 1);
        assert!(ann.to_string().ends_with("Z.z"));

        let too_many: Vec<Vec<&Stem>> = stems[1..].iter().map(|s| vec![s]).collect();
        assert_eq!(encode(db.len(), &stems[..1], &too_many),
            Err(StructureError::TooManyPseudoknotLevels { limit: MAX_KNOT_LEVELS }));
    }
}
