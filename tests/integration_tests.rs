//! Integration tests for the reel library
//!
//! Exercises the full loop: add notation, practice, persist, export and
//! re-import.

use chrono::{DateTime, Duration, TimeZone, Utc};
use reel::{
    ensure_headers, export_all, extract, split_tunebook, Difficulty, FileStore, HeaderDefaults,
    Repertoire, RhythmType, Tune,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 19, 0, 0).unwrap()
}

const TUNEBOOK: &str = r#"X:1
T:Banish Misfortune
R:jig
K:Dmix
|:fed cAG|A2d cAG|

X: 2
T:The Silver Spear
R:reel
K:D
|:A|FA~A2 BAFA|
"#;

#[test]
fn test_extract_banish_misfortune_headers() {
    let meta = extract("T:Banish Misfortune\nR:jig\nK:Dmix\n...");
    assert_eq!(meta.title, "Banish Misfortune");
    assert_eq!(meta.rhythm_type, RhythmType::Jig);
    assert_eq!(meta.key, "Dmix");
}

#[test]
fn test_ensure_headers_prefixes_exactly_eight_lines() {
    let tune = Tune::from_notation("|:GAG GAB|", Difficulty::default(), Vec::<String>::new());
    let abc = ensure_headers(&tune);
    let lines: Vec<&str> = abc.lines().collect();
    assert_eq!(lines.len(), 9);
    let tags: Vec<char> = lines[..8].iter().filter_map(|l| l.chars().next()).collect();
    assert_eq!(tags, vec!['X', 'T', 'R', 'K', 'M', 'L', 'Q', 'Z']);
    assert_eq!(lines[8], "|:GAG GAB|");
}

#[test]
fn test_import_practice_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());

    let mut rep = Repertoire::new(HeaderDefaults::default());
    let ids = rep.import(TUNEBOOK).unwrap();
    assert_eq!(ids.len(), 2);

    // Both never practiced: first in collection order is next
    assert_eq!(rep.next_due(now()).map(|t| t.id), Some(ids[0]));

    rep.practice(ids[0], 5, 20, Some("clean"), now()).unwrap();
    assert_eq!(rep.next_due(now()).map(|t| t.id), Some(ids[1]));
    rep.practice(ids[1], 1, 10, None, now()).unwrap();
    assert!(rep.next_due(now()).is_none());
    rep.save(&mut store).unwrap();

    let mut reloaded = Repertoire::load(&store, HeaderDefaults::default()).unwrap();
    assert_eq!(reloaded.tunes().len(), 2);
    assert_eq!(reloaded.sessions().len(), 2);

    let tomorrow = now() + Duration::days(1);
    assert_eq!(reloaded.due(tomorrow).len(), 2);

    // Second session on tune 1 after 4 days of rest: interval doubles
    let later = now() + Duration::days(4);
    let tune = reloaded.practice(ids[0], 4, 15, None, later).unwrap();
    assert_eq!(tune.next_review, Some(later + Duration::days(8)));
}

#[test]
fn test_export_reimport_export_is_stable() {
    let mut rep = Repertoire::default();
    rep.add_tune("X:40\nT:Kesh\nR:jig\nK:G\n|:GAG GAB|", Difficulty::default(), ["jigs"]);
    rep.add_tune("|:E2BE dEBE|", Difficulty::new(2).unwrap(), ["practice"]);
    rep.import(TUNEBOOK).unwrap();

    let first = rep.export();
    assert!(first.starts_with("X: 1\n"));
    assert!(first.contains("\n\nX: 4\n"));

    let blocks = split_tunebook(&first);
    assert_eq!(blocks.len(), 4);
    let reparsed: Vec<Tune> = blocks
        .iter()
        .map(|b| Tune::from_notation(b, Difficulty::default(), Vec::<String>::new()))
        .collect();
    assert_eq!(export_all(&reparsed), first);
}

#[test]
fn test_import_rejects_incomplete_tunebook() {
    let mut rep = Repertoire::default();
    let result = rep.import("X:1\nT:No Key\nR:reel\n|:abc|");
    assert!(result.is_err());
    assert!(rep.tunes().is_empty());
}
