use std::fs;

use dashboard_engine::{ensure_data_dir, read_optional, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("state").join("dashboard");
    assert!(!nested.exists());

    ensure_data_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn file_in_place_of_data_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_data_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::DataDir(_)));
}

#[test]
fn atomic_write_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("activities.json", "[]").unwrap();
    assert_eq!(first, writer.path_of("activities.json"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = writer.write("activities.json", "[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");

    let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("activities.json", "[]").is_err());
    assert!(!temp.path().join("activities.json").exists());
}

#[test]
fn read_optional_maps_missing_file_to_none() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.json");
    assert!(read_optional(&path).unwrap().is_none());

    fs::write(&path, "[]").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[]"));
}
