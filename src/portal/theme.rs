use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::storage::{KeyValueStore, KeyValueStoreExt};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        store.load(THEME_KEY, Self::default())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggle(&mut self, store: &mut dyn KeyValueStore) -> AppResult<Self> {
        let next = match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        };
        store.save(THEME_KEY, &next)?;
        *self = next;
        Ok(next)
    }
}
