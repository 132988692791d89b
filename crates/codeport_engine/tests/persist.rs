use std::fs;

use codeport_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("downloads").join("today");
    assert!(!nested.exists());

    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn second_download_replaces_the_first() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path());

    let first = writer.write("analysis_results.zip", b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "analysis_results.zip");

    let second = writer.write("analysis_results.zip", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn file_in_place_of_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = AtomicFileWriter::new(&blocker).write("analysis_results.zip", b"data");

    assert!(result.is_err());
    assert!(!temp.path().join("analysis_results.zip").exists());
}

#[test]
fn names_with_directories_are_refused() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("out"));

    for name in ["../escape.zip", "nested/result.zip", "..", ""] {
        assert!(
            matches!(writer.write(name, b"data"), Err(PersistError::InvalidName(_))),
            "{name:?} should be refused"
        );
    }
    assert!(!temp.path().join("escape.zip").exists());
}
