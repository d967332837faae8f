//! Rendering of annotated structures.
//!
//! The `.st` format is line based: a `#` header (name, length, number of
//! pages, warnings), then sequence, dot-bracket, loop classes, pseudoknot
//! flags, and finally one descriptor per line in the order S, H, B, I, M,
//! X, E, PK.
//!

use std::io::Write;
use serde::Serialize;

use sm_structure::StructureMap;


/// Write `sm` in `.st` format.
pub fn write_st<W: Write>(out: &mut W, name: &str, sm: &StructureMap) -> std::io::Result<()> {
    writeln!(out, "#Name: {name}")?;
    writeln!(out, "#Length: {}", sm.len())?;
    writeln!(out, "#PageNumber: {}", sm.pages())?;
    for warning in sm.warnings() {
        writeln!(out, "#Warning: {warning}")?;
    }
    writeln!(out, "{}", sm.sequence())?;
    writeln!(out, "{}", sm.annotation())?;
    writeln!(out, "{}", sm.classification().class_string())?;
    writeln!(out, "{}", sm.classification().knot_string())?;
    for (_, lines) in sm.inventory().iter() {
        for line in lines {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

/// Write one line per segment graph edge:
/// `<from> <to> <neighbor> <endpoint> <label>` with 1-based stem numbers.
pub fn write_graph<W: Write>(out: &mut W, sm: &StructureMap) -> std::io::Result<()> {
    for edge in sm.segment_graph().edges() {
        writeln!(out, "{edge}")?;
    }
    Ok(())
}

/// The JSON view of an annotated structure.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub name: &'a str,
    pub length: usize,
    pub pages: usize,
    pub sequence: &'a str,
    pub dotbracket: String,
    pub classes: String,
    pub knots: String,
    pub warnings: &'a [String],
    pub inventory: Vec<InventoryEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InventoryEntry<'a> {
    pub category: &'static str,
    pub descriptors: &'a [String],
}

impl<'a> Report<'a> {
    pub fn new(name: &'a str, sm: &'a StructureMap) -> Self {
        Report {
            name,
            length: sm.len(),
            pages: sm.pages(),
            sequence: sm.sequence(),
            dotbracket: sm.annotation().to_string(),
            classes: sm.classification().class_string(),
            knots: sm.classification().knot_string(),
            warnings: sm.warnings(),
            inventory: sm.inventory().iter()
                .map(|(c, descriptors)| InventoryEntry { category: c.tag(), descriptors })
                .collect(),
        }
    }
}

/// Write `sm` as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, name: &str, sm: &StructureMap) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &Report::new(name, sm))?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_structure::PairMap;

    fn kissing() -> StructureMap {
        let pm = PairMap::try_from("((..[[..))..]]").unwrap();
        StructureMap::try_from(("GGAACCAACCAAGG", &pm)).unwrap()
    }

    #[test]
    fn test_write_st() {
        let mut buf = Vec::new();
        write_st(&mut buf, "kiss", &kissing()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "#Name: kiss",
            "#Length: 14",
            "#PageNumber: 2",
            "#Warning: segment 2 (5-14) assigned to pseudoknot",
            "GGAACCAACCAAGG",
            "((..[[..))..]]",
            "SSXXSSHHSSXXSS",
            "NNNNKKNNNNNNKK",
            "S1 1-10,2-9",
            "H1 7..8 \"AA\"",
            "X1 3..4 \"AA\"",
            "X2 11..12 \"AA\"",
            "PK1 5-14,6-13",
        ]);
    }

    #[test]
    fn test_write_graph() {
        let pm = PairMap::try_from("((..))..((..))").unwrap();
        let sm = StructureMap::try_from(("AAAAAAAAAAAAAA", &pm)).unwrap();
        let mut buf = Vec::new();
        write_graph(&mut buf, &sm).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1 1 5 5 4\n1 2 9 9 1\n2 2 13 13 4\n");
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&mut buf, "kiss", &kissing()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["pages"], 2);
        assert_eq!(value["dotbracket"], "((..[[..))..]]");
        assert_eq!(value["inventory"][7]["category"], "PK");
        assert_eq!(value["inventory"][7]["descriptors"][0], "PK1 5-14,6-13");
        assert_eq!(value["inventory"].as_array().map(Vec::len), Some(8));
    }
}
