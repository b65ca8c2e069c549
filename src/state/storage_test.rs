use super::*;

#[test]
fn memory_storage_reads_back_written_value() {
    let mut storage = MemoryStorage::new();
    storage.set_item("token", "abc").unwrap();
    assert_eq!(storage.get_item("token").as_deref(), Some("abc"));
}

#[test]
fn memory_storage_overwrites_existing_value() {
    let mut storage = MemoryStorage::with_items([("token", "old")]);
    storage.set_item("token", "new").unwrap();
    assert_eq!(storage.get_item("token").as_deref(), Some("new"));
    storage.remove_item("token").unwrap();
    assert!(storage.is_empty());
}

#[test]
fn memory_storage_remove_missing_key_is_ok() {
    let mut storage = MemoryStorage::new();
    assert!(storage.remove_item("user").is_ok());
    assert!(storage.is_empty());
}

#[test]
fn memory_storage_remove_deletes_key() {
    let mut storage = MemoryStorage::with_items([("token", "abc"), ("user", "{}")]);
    storage.remove_item("token").unwrap();
    assert_eq!(storage.get_item("token"), None);
    assert_eq!(storage.get_item("user").as_deref(), Some("{}"));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn local_storage_is_empty_outside_browser() {
    let mut storage = LocalStorage;
    assert_eq!(storage.get_item("token"), None);
    assert_eq!(storage.set_item("token", "abc"), Err(StorageError::Unavailable));
    assert_eq!(storage.remove_item("token"), Err(StorageError::Unavailable));
}

#[test]
fn storage_error_messages_name_the_key() {
    let err = StorageError::Rejected {
        key: "user".to_owned(),
        reason: "QuotaExceededError".to_owned(),
    };
    assert_eq!(
        err.to_string(),
        "local storage rejected write to `user`: QuotaExceededError"
    );
}
