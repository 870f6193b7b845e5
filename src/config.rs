use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::router::{DEFAULT_HISTORY_CAPACITY, PageId};

const APP_DIR: &str = "bits-connect";

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub router: RouterConfig,
    pub timing: TimingConfig,
    pub storage: StorageConfig,
    pub keymap: KeymapConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    pub protected_pages: Vec<PageId>,
    pub mounted_pages: Vec<PageId>,
    pub history_capacity: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            protected_pages: vec![PageId::Dashboard, PageId::Upload],
            mounted_pages: PageId::ALL.to_vec(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub auth_delay_ms: u64,
    pub convert_delay_ms: u64,
    pub upload_tick_ms: u64,
    pub toast_duration_ms: u64,
    pub redraw_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            auth_delay_ms: 1500,
            convert_delay_ms: 3000,
            upload_tick_ms: 500,
            toast_duration_ms: 3000,
            redraw_interval_ms: 250,
        }
    }
}

impl TimingConfig {
    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }

    pub fn convert_delay(&self) -> Duration {
        Duration::from_millis(self.convert_delay_ms)
    }

    pub fn upload_tick(&self) -> Duration {
        Duration::from_millis(self.upload_tick_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: "bits-connect.log".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.router.history_capacity = self.router.history_capacity.max(1);
        self.router.protected_pages.sort();
        self.router.protected_pages.dedup();
        self.router.mounted_pages.sort();
        self.router.mounted_pages.dedup();
        // home is the fallback route and must always be showable
        if !self.router.mounted_pages.contains(&PageId::Home) {
            self.router.mounted_pages.insert(0, PageId::Home);
        }
        self.router.protected_pages.retain(|page| *page != PageId::Home);

        self.timing.auth_delay_ms = self.timing.auth_delay_ms.max(1);
        self.timing.convert_delay_ms = self.timing.convert_delay_ms.max(1);
        self.timing.upload_tick_ms = self.timing.upload_tick_ms.max(1);
        self.timing.toast_duration_ms = self.timing.toast_duration_ms.max(1);
        self.timing.redraw_interval_ms = self.timing.redraw_interval_ms.max(1);

        if self.log.filter.trim().is_empty() {
            self.log.filter = LogConfig::default().filter;
        }
        if self.log.file.trim().is_empty() {
            self.log.file = LogConfig::default().file;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("BITS_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join(APP_DIR).join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join(APP_DIR)
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join(APP_DIR).join("config.toml"));
    }
    None
}

pub fn default_data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join(APP_DIR),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join(APP_DIR).join("data"));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Config;
    use crate::router::PageId;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("bits_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
        assert_eq!(
            config.router.protected_pages,
            vec![PageId::Dashboard, PageId::Upload]
        );
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [router]
            protected_pages = ["home", "gpa", "gpa"]
            mounted_pages = ["library", "gpa"]
            history_capacity = 0

            [timing]
            auth_delay_ms = 0
            upload_tick_ms = 20

            [log]
            filter = "  "
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.router.protected_pages, vec![PageId::Gpa]);
        assert_eq!(
            config.router.mounted_pages,
            vec![PageId::Home, PageId::Library, PageId::Gpa]
        );
        assert_eq!(config.router.history_capacity, 1);
        assert_eq!(config.timing.auth_delay_ms, 1);
        assert_eq!(config.timing.upload_tick_ms, 20);
        assert_eq!(config.timing.convert_delay_ms, 3000);
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.keymap.preset, "default");

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn unknown_page_names_are_rejected() {
        let path = unique_temp_path("bad.toml");
        fs::write(&path, "[router]\nprotected_pages = [\"settings\"]\n")
            .expect("config file should be written");

        assert!(Config::load_from_path(&path).is_err());

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn explicit_data_dir_wins() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/bits-data"));
        assert_eq!(
            config.storage.resolved_data_dir(),
            PathBuf::from("/tmp/bits-data")
        );
    }
}
