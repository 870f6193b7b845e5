//! Persistent key-value storage for collaborator state.
//!
//! Values are JSON documents keyed by short names such as `currentUser` or
//! `semesters`. Reads never fail: a missing or malformed value falls back to the
//! caller's default.

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{AppError, AppResult};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub trait KeyValueStore: Send {
    fn get_raw(&self, key: &str) -> Option<Value>;
    fn set_raw(&mut self, key: &str, value: Value) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

pub trait KeyValueStoreExt: KeyValueStore {
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get_raw(key) else {
            return default;
        };
        match serde_json::from_value(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "stored value is malformed; using default");
                default
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_value(value).map_err(|source| AppError::storage(key, source))?;
        self.set_raw(key, raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
