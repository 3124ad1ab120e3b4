//! Persisted key-value storage for client state.
//!
//! [`PersistedStorage`] is the infallible facade the stores talk to. It stores one JSON document
//! per key through a [`StorageBackend`] and revives ISO-8601 looking strings into dates on read.
//! A storage without a backend (server-side rendering, headless jobs) turns every operation into
//! a no-op.

use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::PathBuf,
    sync::{Arc, LazyLock},
};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Number, Value};
use thiserror::Error;

static ISO_DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("date pattern compiles")
});

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Raw string storage. Implementations only move text around; JSON handling lives in
/// [`PersistedStorage`].
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, raw: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), raw)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// A parsed persisted document. Same shape as a JSON value, plus `Date` for revived timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<StoredValue>),
    Object(BTreeMap<String, StoredValue>),
}

impl StoredValue {
    /// Converts parsed JSON, replacing every date-looking string (at any depth) with a date.
    pub fn revive(value: Value) -> Self {
        match value {
            Value::Null => StoredValue::Null,
            Value::Bool(b) => StoredValue::Bool(b),
            Value::Number(n) => StoredValue::Number(n),
            Value::String(s) => revive_string(s),
            Value::Array(items) => {
                StoredValue::Array(items.into_iter().map(StoredValue::revive).collect())
            }
            Value::Object(map) => StoredValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, StoredValue::revive(value)))
                    .collect(),
            ),
        }
    }

    /// Back to plain JSON. Dates become RFC 3339 strings without losing precision.
    pub fn into_json(self) -> Value {
        match self {
            StoredValue::Null => Value::Null,
            StoredValue::Bool(b) => Value::Bool(b),
            StoredValue::Number(n) => Value::Number(n),
            StoredValue::String(s) => Value::String(s),
            StoredValue::Date(date) => {
                Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            StoredValue::Array(items) => {
                Value::Array(items.into_iter().map(StoredValue::into_json).collect())
            }
            StoredValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        match self {
            StoredValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StoredValue]> {
        match self {
            StoredValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

fn revive_string(raw: String) -> StoredValue {
    if !ISO_DATE_PREFIX.is_match(&raw) {
        return StoredValue::String(raw);
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(&raw) {
        return StoredValue::Date(date.with_timezone(&Utc));
    }
    // No offset: read as UTC.
    match NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => StoredValue::Date(naive.and_utc()),
        Err(_) => StoredValue::String(raw),
    }
}

#[derive(Clone, Default)]
pub struct PersistedStorage {
    backend: Option<Arc<dyn StorageBackend>>,
}

impl std::fmt::Debug for PersistedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStorage")
            .field("available", &self.is_available())
            .finish()
    }
}

impl PersistedStorage {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(dir)))
    }

    /// Storage for contexts without a persistent store. Reads return `None`, writes are dropped.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Reads and parses the document under `name`, reviving dates. Missing, empty, unreadable or
    /// malformed documents all read as `None`.
    pub fn get(&self, name: &str) -> Option<StoredValue> {
        let backend = self.backend.as_ref()?;
        let raw = match backend.read(name) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = name, error = %err, "persisted state read failed");
                return None;
            }
        };
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Some(StoredValue::revive(value)),
            Err(err) => {
                tracing::warn!(key = name, error = %err, "discarding malformed persisted state");
                None
            }
        }
    }

    /// Typed read that goes through the same date reviver as [`PersistedStorage::get`].
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.get(name)?.into_json();
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                tracing::warn!(key = name, error = %err, "persisted state has unexpected shape");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|raw| backend.write(name, &raw));
        if let Err(err) = result {
            tracing::warn!(key = name, error = %err, "persisted state write failed");
        }
    }

    pub fn remove(&self, name: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(err) = backend.delete(name) {
            tracing::warn!(key = name, error = %err, "persisted state delete failed");
        }
    }
}
