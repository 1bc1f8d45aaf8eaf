//! Best-effort key-value storage for numbers
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `JsonFileStore`: one JSON object per file (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Callers treat every backend as unreliable: errors are logged and the
//! game keeps going with whatever it already has in memory.

use std::collections::BTreeMap;

use crate::error::StoreError;

/// Numeric key-value store
pub trait KvStore {
    /// Read a value; `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<f64>, StoreError>;
    /// Write a value
    fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError>;
}

/// Volatile store backed by a map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<f64>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store that is never available (no storage on this host)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl KvStore for NullStore {
    fn get(&self, _key: &str) -> Result<Option<f64>, StoreError> {
        Err(StoreError::Unavailable("no storage attached"))
    }

    fn set(&mut self, _key: &str, _value: f64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("no storage attached"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use serde_json::{Map, Value};

    use super::KvStore;
    use crate::error::StoreError;

    /// Flat JSON object on disk, e.g. `{ "bestScore": 4210 }`
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
            match fs::read_to_string(&self.path) {
                Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
                Ok(contents) => Ok(serde_json::from_str(&contents)?),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
                Err(e) => Err(e.into()),
            }
        }
    }

    impl KvStore for JsonFileStore {
        fn get(&self, key: &str) -> Result<Option<f64>, StoreError> {
            let map = self.read_map()?;
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Number(n)) => Ok(n.as_f64()),
                // Strings are accepted as long as they parse
                Some(Value::String(s)) => s
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| StoreError::InvalidNumber {
                        key: key.to_string(),
                        raw: s.clone(),
                    }),
                Some(other) => Err(StoreError::InvalidNumber {
                    key: key.to_string(),
                    raw: other.to_string(),
                }),
            }
        }

        fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
            let mut map = self.read_map()?;
            map.insert(key.to_string(), Value::from(value));
            if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let json = serde_json::to_string_pretty(&map)?;
            fs::write(&self.path, json)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KvStore;
    use crate::error::StoreError;

    /// Browser LocalStorage; values are stored as decimal strings
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StoreError::Unavailable("LocalStorage"))
        }
    }

    impl KvStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<f64>, StoreError> {
            let raw = Self::storage()?
                .get_item(key)
                .map_err(|_| StoreError::Unavailable("LocalStorage read"))?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| StoreError::InvalidNumber {
                        key: key.to_string(),
                        raw: s,
                    }),
            }
        }

        fn set(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(key, &value.to_string())
                .map_err(|_| StoreError::Unavailable("LocalStorage write"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("bestScore").unwrap(), None);
        store.set("bestScore", 1234.0).unwrap();
        assert_eq!(store.get("bestScore").unwrap(), Some(1234.0));
    }

    #[test]
    fn test_null_store_unavailable() {
        let mut store = NullStore;
        assert!(matches!(store.get("k"), Err(StoreError::Unavailable(_))));
        assert!(store.set("k", 1.0).is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("endless-drive-{}-{}", name, std::process::id()))
            .join("store.json")
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_creates_and_keeps_keys() {
        let path = scratch_path("keys");
        let _ = std::fs::remove_file(&path);
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("bestScore").unwrap(), None);
        store.set("bestScore", 900.0).unwrap();
        store.set("other", 2.5).unwrap();
        assert_eq!(store.get("bestScore").unwrap(), Some(900.0));
        assert_eq!(store.get("other").unwrap(), Some(2.5));
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_bad_value() {
        let path = scratch_path("bad");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "bestScore": "lots", "legacy": "42" }"#).unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get("bestScore"),
            Err(StoreError::InvalidNumber { .. })
        ));
        assert_eq!(store.get("legacy").unwrap(), Some(42.0));
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_malformed() {
        let path = scratch_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ nope").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get("bestScore"), Err(StoreError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}
