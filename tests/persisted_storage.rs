use std::sync::Arc;

use apparel_storefront::storage::{
    FileBackend, MemoryBackend, PersistedStorage, StorageBackend, StoredValue,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Stamped {
    label: String,
    at: DateTime<Utc>,
}

#[test]
fn dates_come_back_as_dates() {
    let storage = PersistedStorage::in_memory();
    let at = Utc
        .with_ymd_and_hms(2024, 3, 15, 10, 30, 0)
        .single()
        .expect("valid date");
    storage.set("stamp", &json!({ "at": at, "nested": [{ "when": at }] }));

    let value = storage.get("stamp").expect("stored value");
    let revived = value.get("at").and_then(StoredValue::as_date).expect("revived date");
    assert_eq!(revived.timestamp_millis(), at.timestamp_millis());

    let nested = value
        .get("nested")
        .and_then(StoredValue::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("when"))
        .and_then(StoredValue::as_date);
    assert_eq!(nested, Some(at));
}

#[test]
fn typed_load_round_trips_subsecond_precision() {
    let storage = PersistedStorage::in_memory();
    let original = Stamped {
        label: "order".into(),
        at: Utc::now(),
    };
    storage.set("stamped", &original);

    let loaded: Stamped = storage.load("stamped").expect("typed value");
    assert_eq!(loaded, original);
}

#[test]
fn non_date_strings_are_left_alone() {
    let storage = PersistedStorage::in_memory();
    storage.set(
        "strings",
        &json!({ "plain": "hello", "dateOnly": "2024-03-15", "bogus": "2024-13-45T99:99:99" }),
    );

    let value = storage.get("strings").expect("stored value");
    assert_eq!(value.get("plain").and_then(StoredValue::as_str), Some("hello"));
    assert_eq!(
        value.get("dateOnly").and_then(StoredValue::as_str),
        Some("2024-03-15")
    );
    assert_eq!(
        value.get("bogus").and_then(StoredValue::as_str),
        Some("2024-13-45T99:99:99")
    );
}

#[test]
fn timestamp_without_offset_is_read_as_utc() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .write("naive", r#"{"at":"2024-03-15T10:30:00"}"#)
        .expect("memory write");
    let storage = PersistedStorage::new(backend);

    let at = storage
        .get("naive")
        .and_then(|value| value.get("at").and_then(StoredValue::as_date));
    assert_eq!(
        at,
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).single()
    );
}

#[test]
fn malformed_documents_read_as_absent() {
    let backend = Arc::new(MemoryBackend::new());
    backend.write("broken", "{not json").expect("memory write");
    backend.write("blank", "   ").expect("memory write");
    let storage = PersistedStorage::new(backend);

    assert!(storage.get("broken").is_none());
    assert!(storage.get("blank").is_none());
    assert!(storage.get("missing").is_none());
}

#[test]
fn unavailable_storage_is_a_no_op() {
    let storage = PersistedStorage::unavailable();
    assert!(!storage.is_available());

    storage.set("key", &json!({ "a": 1 }));
    assert!(storage.get("key").is_none());
    storage.remove("key");
}

#[test]
fn remove_deletes_the_document() {
    let storage = PersistedStorage::in_memory();
    storage.set("key", &json!([1, 2, 3]));
    assert!(storage.get("key").is_some());

    storage.remove("key");
    assert!(storage.get("key").is_none());
}

#[test]
fn file_backend_persists_across_instances() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let at = Utc
        .with_ymd_and_hms(2023, 12, 31, 23, 59, 59)
        .single()
        .expect("valid date");

    PersistedStorage::file(dir.path()).set("cart-storage", &json!({ "savedAt": at }));
    assert!(dir.path().join("cart-storage.json").exists());

    let reopened = PersistedStorage::file(dir.path());
    let saved_at = reopened
        .get("cart-storage")
        .and_then(|value| value.get("savedAt").and_then(StoredValue::as_date));
    assert_eq!(saved_at, Some(at));

    reopened.remove("cart-storage");
    assert!(!dir.path().join("cart-storage.json").exists());
    Ok(())
}

#[test]
fn file_backend_missing_file_reads_as_none() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let backend = FileBackend::new(dir.path().join("not-created-yet"));
    assert_eq!(backend.read("anything")?, None);
    backend.delete("anything")?;
    Ok(())
}
