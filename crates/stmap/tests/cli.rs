use std::fs;
use std::process::Command;

const KISSING: &str = "\
>kiss
GGGGAAACCCCAGGGGAAAGGGG
((((...[[[[.))))...]]]]
";

const HAIRPIN_BPSEQ: &str = "\
1 G 10
2 G 9
3 G 8
4 G 7
5 A 0
6 A 0
7 C 4
8 C 3
9 C 2
10 C 1
";

fn stmap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stmap"))
}

#[test]
fn writes_st_file_next_to_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hairpin.bpseq");
    fs::write(&input, HAIRPIN_BPSEQ).unwrap();

    let status = stmap().current_dir(dir.path()).arg(&input).status().unwrap();
    assert!(status.success());

    let st = fs::read_to_string(dir.path().join("hairpin.st")).unwrap();
    let lines: Vec<&str> = st.lines().collect();
    assert_eq!(&lines[..3], &["#Name: hairpin", "#Length: 10", "#PageNumber: 1"]);
    assert_eq!(&lines[3..7], &["GGGGAACCCC", "((((..))))", "SSSSHHSSSS", "NNNNNNNNNN"]);
    assert_eq!(&lines[7..], &["S1 1-10,2-9,3-8,4-7", "H1 5..6 \"AA\""]);
}

#[test]
fn reports_pseudoknots_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("kiss.dbn");
    fs::write(&input, KISSING).unwrap();

    let out = stmap().arg("--stdout").arg("--graph").arg(&input).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("#PageNumber: 2\n"));
    assert!(text.contains("#Warning: segment 2 (8-23) assigned to pseudoknot\n"));
    assert!(text.contains("PK1 8-23,9-22,10-21,11-20\n"));
    // The single main stem closes its hairpin onto itself.
    assert!(text.ends_with("1 1 13 13 4\n"));
}

#[test]
fn writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("kiss.dbn");
    let output = dir.path().join("report.json");
    fs::write(&input, KISSING).unwrap();

    let status = stmap().arg("--json").arg("-o").arg(&output).arg(&input).status().unwrap();
    assert!(status.success());
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["name"], "kiss");
    assert_eq!(value["length"], 23);
    assert_eq!(value["knots"], "NNNNNNNKKKKNNNNNNNNKKKK");
}

#[test]
fn fails_on_empty_structure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.dbn");
    fs::write(&input, "GGAACC\n......\n").unwrap();

    let out = stmap().arg("--stdout").arg(&input).output().unwrap();
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let err = String::from_utf8(out.stderr).unwrap();
    assert!(err.contains("Empty structure"));
}

#[test]
fn fails_on_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("junk.txt");
    fs::write(&input, "this is not a structure\n").unwrap();

    let out = stmap().arg(&input).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr).unwrap().contains("Unknown format"));
}
