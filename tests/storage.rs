use tempfile::TempDir;
use workpool::storage;
use workpool::ErrorKind;

#[test]
fn local_roundtrip() {
    let dir = TempDir::new().unwrap();
    // nested path, the parent directories don't exist yet
    let path = dir
        .path()
        .join("sub")
        .join("data.txt")
        .to_string_lossy()
        .into_owned();

    storage::write_string(&path, "hello").unwrap();
    assert!(storage::exists(&path).unwrap());
    assert_eq!(storage::read_string(&path).unwrap(), "hello");

    let root = dir.path().to_string_lossy().into_owned();
    let entries = storage::list(&root).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path(), path);
    assert_eq!(entries[0].size(), 5);

    storage::delete(&path).unwrap();
    assert!(!storage::exists(&path).unwrap());
}

#[test]
fn memory_roundtrip() {
    let path = "mem://roundtrip/a.txt";

    storage::write_bytes(path, b"payload").unwrap();
    assert!(storage::exists(path).unwrap());
    assert_eq!(storage::read_bytes(path).unwrap(), b"payload");

    let entries = storage::list("mem://roundtrip/").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size(), 7);

    storage::delete(path).unwrap();
    assert!(!storage::exists(path).unwrap());
}

#[test]
fn memory_read_of_missing_path_is_not_found() {
    let err = storage::read_bytes("mem://missing/nope.txt").unwrap_err();
    assert!(match err.kind() {
        ErrorKind::NotFound(_) => true,
        _ => false,
    });
}

#[test]
fn read_string_rejects_invalid_utf8() {
    let path = "mem://utf8-check/blob.bin";
    storage::write_bytes(path, &[0xff, 0xfe, 0x00]).unwrap();

    assert!(storage::read_string(path).is_err());
    // the raw bytes stay readable untouched
    assert_eq!(storage::read_bytes(path).unwrap(), vec![0xff, 0xfe, 0x00]);
    storage::delete(path).unwrap();
}

#[test]
fn prefix_selects_the_backend() {
    // a mem:// path must never touch the filesystem
    let path = "mem://backend-pick/file.bin";
    storage::write_bytes(path, &[1, 2, 3]).unwrap();
    assert!(!std::path::Path::new(path).exists());
    storage::delete(path).unwrap();
}
