use std::fs;

use sqldoc_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("results").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_output_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)));
}

#[test]
fn atomic_write_replaces_existing_archive() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("out.zip", b"PK\x03\x04first").unwrap();
    assert_eq!(first.file_name().unwrap(), "out.zip");
    assert_eq!(fs::read(&first).unwrap(), b"PK\x03\x04first");

    let second = writer.write("out.zip", b"PK\x03\x04second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"PK\x03\x04second");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("out.zip", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("out.zip").exists());
}
