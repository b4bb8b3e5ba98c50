//! Durable key-value storage for user preferences.
//!
//! Values are JSON documents addressed by a short key. A single `set` is
//! atomic; there is no multi-key transaction.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

pub const SAVED_JOBS: &str = "savedJobs";
pub const SOURCES: &str = "sources";
pub const SUGGESTIONS: &str = "suggestions";

/// Closure handed to [`Store::update`]: current value in, new value out.
pub type Update<'a> = &'a mut dyn FnMut(Option<Value>) -> Result<Value, StoreError>;

pub trait Store: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set_raw(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Reads, transforms and writes `key` with no other write in between.
    fn update(&self, key: &str, f: Update<'_>) -> Result<(), StoreError>;
}

/// Typed access on top of any [`Store`].
pub trait StoreExt: Store {
    /// Returns `T::default()` when the key has never been written.
    fn get<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.get_raw(key)? {
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    fn set<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set_raw(key, value)
    }

    /// Appends one record to the JSON array stored under `key`.
    fn append<T>(&self, key: &str, record: T) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut record = Some(record);
        self.update(key, &mut |current| {
            let mut records: Vec<T> = match current {
                Some(value) => serde_json::from_value(value).map_err(|source| {
                    StoreError::Serialization {
                        key: key.to_string(),
                        source,
                    }
                })?,
                None => Vec::new(),
            };
            records.extend(record.take());
            serde_json::to_value(&records).map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            })
        })
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        tracing::debug!("opened store at {}", dir.display());
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let raw = match fs::read(self.path_for(key)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            })
    }

    /// Caller holds `self.lock`.
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &target).map_err(io_err)?;
        tracing::debug!("wrote store key {key}");
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read(key)
    }

    fn set_raw(&self, key: &str, value: Value) -> Result<(), StoreError> {
        // a poisoned lock only means another writer panicked mid-write; the
        // rename in `write` keeps the file itself consistent
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write(key, &value)
    }

    fn update(&self, key: &str, f: Update<'_>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let next = f(self.read(key)?)?;
        self.write(key, &next)
    }
}

/// In-process store, used in tests and when no store directory is set.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn update(&self, key: &str, f: Update<'_>) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        let next = f(values.get(key).cloned())?;
        values.insert(key.to_string(), next);
        Ok(())
    }
}
