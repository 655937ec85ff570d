use std::fs;
use std::path::PathBuf;

use lineup_terminal::library::{FetchOptions, Library};
use lineup_terminal::pool::{UNKNOWN_POSITION, normalize_rows, parse_season_bounds};
use lineup_terminal::roster_csv::parse_csv;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn test_library() -> Library {
    Library::new("sample", "Sample roster", "sample", &[], FetchOptions::default())
}

#[test]
fn season_bounds_span_min_and_max_year() {
    let bounds = parse_season_bounds("1985-2004").expect("bounds");
    assert_eq!((bounds.start, bounds.end), (1985, 2004));

    let bounds = parse_season_bounds("2010, 2008 and 2021").expect("bounds");
    assert_eq!((bounds.start, bounds.end), (2008, 2021));

    let bounds = parse_season_bounds("2019").expect("bounds");
    assert_eq!((bounds.start, bounds.end), (2019, 2019));
}

#[test]
fn season_bounds_ignore_non_year_numbers() {
    assert!(parse_season_bounds("").is_none());
    assert!(parse_season_bounds("n/a").is_none());
    assert!(parse_season_bounds("1899-1850").is_none());
    assert!(parse_season_bounds("12 seasons").is_none());
}

#[test]
fn normalizes_and_dedupes_fixture() {
    let rows = parse_csv(&read_fixture("roster_sample.csv"));
    let pool = normalize_rows(&rows, &test_library());

    assert_eq!(pool.len(), 11);
    assert_eq!(pool[0].name, "Tom Brady");
    assert_eq!(pool[0].season_start, Some(2019));
    assert_eq!(pool[0].season_end, Some(2019));
    assert_eq!(
        pool.iter().filter(|p| p.name == "Tom Brady").count(),
        1,
        "first occurrence of name|position wins"
    );

    let kelce = pool
        .iter()
        .find(|p| p.name == "Jason Kelce")
        .expect("trimmed name should be present");
    assert_eq!(kelce.position, "C");
    assert_eq!(kelce.name_lower, "jason kelce");

    let mystery = pool
        .iter()
        .find(|p| p.name == "Mystery Man")
        .expect("row without position is kept");
    assert_eq!(mystery.position, UNKNOWN_POSITION);

    assert!(pool.iter().all(|p| !p.name.is_empty()));
    assert!(pool.iter().all(|p| p.library_id == "sample"));
    assert!(pool.iter().all(|p| p.library_label == "sample"));
}

#[test]
fn same_name_different_position_is_not_a_duplicate() {
    let rows = parse_csv("full_name,position\nDeion Sanders,DB\nDeion Sanders,WR\nDeion Sanders,DB\n");
    let pool = normalize_rows(&rows, &test_library());
    assert_eq!(pool.len(), 2);
    assert_eq!(pool[0].position, "DB");
    assert_eq!(pool[1].position, "WR");
}

#[test]
fn alternate_column_names_are_recognised() {
    let rows = parse_csv("player_name,pos,years_active\nReggie White,de,1985-2000\n");
    let pool = normalize_rows(&rows, &test_library());
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].name, "Reggie White");
    assert_eq!(pool[0].position, "DE");
    assert_eq!(pool[0].seasons, "1985-2000");
    assert_eq!(pool[0].season_start, Some(1985));
    assert_eq!(pool[0].season_end, Some(2000));
}

#[test]
fn library_label_falls_back_to_label_when_tag_is_empty() {
    let library = Library::new("x", "Full label", "", &[], FetchOptions::default());
    let pool = normalize_rows(&parse_csv("name\nJunior Seau\n"), &library);
    assert_eq!(pool[0].library_label, "Full label");
    assert!(pool[0].season_start.is_none());
}
