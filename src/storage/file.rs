use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{AppError, AppResult};

/// All keys live in one JSON object file, rewritten through a temp file on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| {
                AppError::io_with_context(
                    source,
                    format!("failed to create data dir: {}", parent.display()),
                )
            })?;
        }

        let values = read_values(&path)?;
        debug!(path = %path.display(), keys = values.len(), "opened store");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `values` to disk and adopts them only once the file is replaced,
    /// so a failed write leaves the in-memory view untouched.
    fn commit(&mut self, values: BTreeMap<String, Value>) -> AppResult<()> {
        self.write_file(&values)?;
        self.values = values;
        Ok(())
    }

    fn write_file(&self, values: &BTreeMap<String, Value>) -> AppResult<()> {
        let encoded = serde_json::to_string_pretty(values)
            .map_err(|source| AppError::storage(self.path.display().to_string(), source))?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, encoded).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to write store: {}", temp_path.display()),
            )
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to replace store: {}", self.path.display()),
            )
        })
    }
}

fn read_values(path: &Path) -> AppResult<BTreeMap<String, Value>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read_to_string(path).map_err(|source| {
        AppError::io_with_context(source, format!("failed to read store: {}", path.display()))
    })?;
    match serde_json::from_str(&raw) {
        Ok(values) => Ok(values),
        Err(err) => {
            warn!(path = %path.display(), %err, "store file is malformed; starting empty");
            Ok(BTreeMap::new())
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: Value) -> AppResult<()> {
        let mut next = self.values.clone();
        next.insert(key.to_string(), value);
        self.commit(next)
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        if !self.values.contains_key(key) {
            return Ok(());
        }
        let mut next = self.values.clone();
        next.remove(key);
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::JsonFileStore;
    use crate::storage::{KeyValueStore, KeyValueStoreExt};

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("bits_store_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn values_survive_reopen() {
        let path = unique_temp_path("reopen.json");
        {
            let mut store = JsonFileStore::open(&path).expect("store should open");
            store.save("theme", &"light").expect("save should succeed");
            store.save("bookmarks", &vec![1, 2]).expect("save should succeed");
            store.remove("bookmarks").expect("remove should succeed");
        }

        let store = JsonFileStore::open(&path).expect("store should reopen");
        assert_eq!(store.load("theme", String::new()), "light");
        assert!(store.get_raw("bookmarks").is_none());

        fs::remove_file(&path).expect("store file should be removed");
    }

    #[test]
    fn failed_write_keeps_previous_values() {
        let path = unique_temp_path("blocked.json");
        let mut store = JsonFileStore::open(&path).expect("store should open");
        store.save("theme", &"dark").expect("save should succeed");
        store.save("bookmarks", &vec![1]).expect("save should succeed");

        // a directory in place of the temp file makes every write fail
        let temp_path = path.with_extension("json.tmp");
        fs::create_dir(&temp_path).expect("blocking dir should be created");

        assert!(store.save("theme", &"light").is_err());
        assert_eq!(store.load("theme", String::new()), "dark");
        assert!(store.remove("bookmarks").is_err());
        assert_eq!(store.load("bookmarks", Vec::<u32>::new()), vec![1]);

        fs::remove_dir(&temp_path).expect("blocking dir should be removed");
        fs::remove_file(&path).expect("store file should be removed");
    }

    #[test]
    fn malformed_file_opens_empty() {
        let path = unique_temp_path("broken.json");
        fs::write(&path, "{ not json").expect("file should be written");

        let store = JsonFileStore::open(&path).expect("malformed store still opens");
        assert!(store.get_raw("currentUser").is_none());

        fs::remove_file(&path).expect("store file should be removed");
    }
}
