use std::io::Write;

use super::fs::open_file_for_append;

#[test]
fn test_open_file_for_append_creates_missing_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/logs/steward.log");

    let mut file = open_file_for_append(&path).unwrap();
    writeln!(file, "first line").unwrap();

    // Reopening appends instead of truncating.
    let mut file = open_file_for_append(&path).unwrap();
    writeln!(file, "second line").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "first line\nsecond line\n");
}
