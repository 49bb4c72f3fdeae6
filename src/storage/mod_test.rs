use super::*;

// =============================================================
// MemoryStorage
// =============================================================

#[test]
fn memory_get_missing_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn memory_set_then_get() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "abc").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
}

#[test]
fn memory_set_overwrites() {
    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "old")]);
    storage.set(TOKEN_KEY, "new").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("new"));
}

#[test]
fn memory_remove_missing_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove(USER_KEY).is_ok());
}

// =============================================================
// helpers
// =============================================================

#[test]
fn read_token_empty_string_is_absent() {
    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "")]);
    assert_eq!(read_token(&storage), None);
}

#[test]
fn read_token_present() {
    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "T")]);
    assert_eq!(read_token(&storage).as_deref(), Some("T"));
}

#[test]
fn clear_session_keys_removes_both_and_keeps_others() {
    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "T"), (USER_KEY, "{}"), ("theme", "dark")]);
    clear_session_keys(&storage);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
}
