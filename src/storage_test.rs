use super::*;

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);

    storage.set(ACCESS_TOKEN_KEY, "A").unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));

    storage.remove(ACCESS_TOKEN_KEY).unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
}

#[test]
fn memory_remove_missing_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove(USER_KEY).is_ok());
}

#[test]
fn memory_with_entries_seeds_values() {
    let storage = MemoryStorage::with_entries([(ACCESS_TOKEN_KEY, "A"), (USER_KEY, "{}")]);
    assert_eq!(storage.entries().len(), 2);
    assert_eq!(storage.get(USER_KEY).as_deref(), Some("{}"));
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_missing_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
    assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
    assert!(!storage.path().exists());
}

#[test]
fn file_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set(ACCESS_TOKEN_KEY, "A").unwrap();
    storage.set(REFRESH_TOKEN_KEY, "R").unwrap();
    storage.remove(REFRESH_TOKEN_KEY).unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
    assert_eq!(reopened.get(REFRESH_TOKEN_KEY), None);
}

#[test]
fn file_corrupt_contents_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(storage.get(USER_KEY), None);

    storage.set(USER_KEY, "{\"id\":1}").unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"user\""));
}

#[cfg(unix)]
#[test]
fn file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let storage = FileStorage::open(&path).unwrap();
    storage.set(ACCESS_TOKEN_KEY, "A").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
