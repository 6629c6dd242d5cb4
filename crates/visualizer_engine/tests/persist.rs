use std::fs;

use visualizer_engine::{ensure_output_dir, result_file_name, AtomicFileWriter, PersistError};

#[test]
fn atomic_writer_creates_directory_and_replaces_file() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("results");
    let writer = AtomicFileWriter::new(dir.clone());

    let path = writer.write("area.mp4", b"first").expect("write");
    assert_eq!(path, dir.join("area.mp4"));
    assert_eq!(fs::read(&path).unwrap(), b"first");

    writer.write("area.mp4", b"second").expect("rewrite");
    assert_eq!(fs::read(&path).unwrap(), b"second");
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn output_dir_must_be_a_directory() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("plain");
    fs::write(&file, "x").unwrap();

    assert!(matches!(
        ensure_output_dir(&file),
        Err(PersistError::OutputDir(_))
    ));
}

#[test]
fn result_file_name_uses_last_component() {
    assert_eq!(
        result_file_name("media/videos/area/480p15/area.mp4").unwrap(),
        "area.mp4"
    );
    assert_eq!(result_file_name("C:\\out\\notes.json").unwrap(), "notes.json");
    assert!(result_file_name("media/..").is_err());
    assert!(result_file_name("media/").is_err());
}
