use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

/// Installs a file-backed subscriber. `RUST_LOG` overrides the configured filter.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
pub fn init(config: &LogConfig, data_dir: &Path) -> AppResult<()> {
    std::fs::create_dir_all(data_dir).map_err(|source| {
        AppError::io_with_context(
            source,
            format!("failed to create data dir: {}", data_dir.display()),
        )
    })?;
    let path = data_dir.join(&config.file);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log: {}", path.display()))
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|err| AppError::unsupported(format!("logging already initialized: {err}")))
}
