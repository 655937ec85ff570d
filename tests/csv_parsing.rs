use std::fs;
use std::path::PathBuf;

use lineup_terminal::roster_csv::parse_csv;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_roster_fixture() {
    let rows = parse_csv(&read_fixture("roster_sample.csv"));
    assert_eq!(rows.len(), 13, "blank line should be skipped");
    assert_eq!(rows[0]["full_name"], "Tom Brady");
    assert_eq!(rows[0]["season"], "2019");
    assert_eq!(rows[0]["team"], "NE");
}

#[test]
fn quoted_cells_keep_commas_and_escaped_quotes() {
    let rows = parse_csv(&read_fixture("roster_sample.csv"));
    assert_eq!(rows[2]["full_name"], "Brady, Tom");
    assert_eq!(rows[2]["position"], "QB");
    let quoted = rows
        .iter()
        .find(|row| row["position"] == "WR" && row["full_name"].starts_with("Quoted"))
        .expect("quoted row should parse");
    assert_eq!(quoted["full_name"], "Quoted \"Nickname\" Player");
}

#[test]
fn crlf_line_endings_are_stripped() {
    let rows = parse_csv("full_name,position\r\nJerry Rice,WR\r\nRandy Moss,WR\r\n");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["position"], "WR");
    assert_eq!(rows[1]["full_name"], "Randy Moss");
}

#[test]
fn short_rows_fill_missing_cells_with_empty_strings() {
    let rows = parse_csv("full_name,position,seasons\nBarry Sanders\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["full_name"], "Barry Sanders");
    assert_eq!(rows[0]["position"], "");
    assert_eq!(rows[0]["seasons"], "");
}

#[test]
fn extra_cells_are_ignored() {
    let rows = parse_csv("full_name,position\nEmmitt Smith,RB,DAL,1990\n");
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[0]["position"], "RB");
}
