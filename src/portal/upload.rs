use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::storage::{KeyValueStore, KeyValueStoreExt};
use crate::util::generate_id;

pub const UPLOADED_FILES_KEY: &str = "uploadedFiles";
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
const MAX_TICK_PERCENT: f64 = 20.0;

const SUPPORTED_TYPES: [(&str, &str); 5] = [
    ("pdf", "application/pdf"),
    ("epub", "application/epub+zip"),
    ("txt", "text/plain"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
    pub status: UploadStatus,
    pub progress: f64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub converted_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Progressed(f64),
    Completed(String),
    /// The file is gone or no longer uploading; its tick chain ends.
    Stopped,
}

#[derive(Debug, Clone)]
struct PendingConversion {
    ticket: u64,
    url: String,
    host: String,
}

/// Returns the MIME type for an accepted upload.
pub fn validate_upload(name: &str, size: u64) -> AppResult<&'static str> {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let Some((_, mime)) = SUPPORTED_TYPES.iter().find(|(ext, _)| *ext == extension) else {
        return Err(AppError::validation(format!(
            "{name} is not a supported file type"
        )));
    };
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::validation(format!(
            "{name} is too large (max 100MB)"
        )));
    }
    Ok(mime)
}

#[derive(Debug, Default)]
pub struct UploadManager {
    files: Vec<UploadedFile>,
    converting: Option<PendingConversion>,
    next_ticket: u64,
}

impl UploadManager {
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        Self {
            files: store.load(UPLOADED_FILES_KEY, Vec::new()),
            ..Self::default()
        }
    }

    pub fn reload(&mut self, store: &dyn KeyValueStore) {
        self.files = store.load(UPLOADED_FILES_KEY, Vec::new());
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn file(&self, index: usize) -> Option<&UploadedFile> {
        self.files.get(index)
    }

    pub fn uploading_ids(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|file| file.status == UploadStatus::Uploading)
            .map(|file| file.id.clone())
            .collect()
    }

    pub fn is_converting(&self) -> bool {
        self.converting.is_some()
    }

    /// Reads the file's metadata from disk and queues it as uploading.
    pub fn upload_path(
        &mut self,
        path: &Path,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let metadata = fs::metadata(path).map_err(|source| {
            AppError::io_with_context(source, format!("cannot read {}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(AppError::invalid_argument(format!(
                "not a regular file: {}",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::invalid_argument("file name is not valid UTF-8"))?;
        self.accept(name, metadata.len(), store, now)
    }

    pub fn accept(
        &mut self,
        name: &str,
        size: u64,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let mime = validate_upload(name, size)?;
        let file = UploadedFile {
            id: generate_id(),
            name: name.to_string(),
            size,
            mime: mime.to_string(),
            status: UploadStatus::Uploading,
            progress: 0.0,
            uploaded_at: now,
            url: None,
            converted_url: None,
        };
        let id = file.id.clone();
        info!(name, size, "upload started");
        self.files.insert(0, file);
        self.persist(store)?;
        Ok(id)
    }

    pub fn tick(&mut self, file_id: &str, store: &mut dyn KeyValueStore) -> AppResult<TickOutcome> {
        let increment = rand::thread_rng().gen_range(0.0..MAX_TICK_PERCENT);
        self.tick_by(file_id, increment, store)
    }

    pub fn tick_by(
        &mut self,
        file_id: &str,
        increment: f64,
        store: &mut dyn KeyValueStore,
    ) -> AppResult<TickOutcome> {
        let Some(file) = self
            .files
            .iter_mut()
            .find(|file| file.id == file_id && file.status == UploadStatus::Uploading)
        else {
            return Ok(TickOutcome::Stopped);
        };

        file.progress += increment.max(0.0);
        let outcome = if file.progress >= 100.0 {
            file.progress = 100.0;
            file.status = UploadStatus::Completed;
            file.url = Some(format!("https://example.com/files/{}", file.name));
            file.converted_url = Some(format!("https://example.com/converted/{}", file.name));
            info!(name = %file.name, "upload completed");
            TickOutcome::Completed(file.name.clone())
        } else {
            TickOutcome::Progressed(file.progress)
        };
        self.persist(store)?;
        Ok(outcome)
    }

    pub fn begin_conversion(&mut self, raw: &str) -> AppResult<u64> {
        let raw = raw.trim();
        let host = Url::parse(raw)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| AppError::validation("Please enter a valid URL"))?;
        if self.converting.is_some() {
            return Err(AppError::validation("A conversion is already in progress"));
        }

        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = self.next_ticket;
        self.converting = Some(PendingConversion {
            ticket,
            url: raw.to_string(),
            host,
        });
        Ok(ticket)
    }

    pub fn complete_conversion(
        &mut self,
        ticket: u64,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UploadedFile>> {
        match &self.converting {
            Some(pending) if pending.ticket == ticket => {}
            _ => return Ok(None),
        }
        let Some(pending) = self.converting.take() else {
            return Ok(None);
        };

        let name = format!("{}.pdf", pending.host);
        let file = UploadedFile {
            id: generate_id(),
            size: rand::thread_rng().gen_range(1_000_000..6_000_000),
            mime: "application/pdf".to_string(),
            status: UploadStatus::Completed,
            progress: 100.0,
            uploaded_at: now,
            url: Some(pending.url),
            converted_url: Some(format!("https://example.com/converted/{name}")),
            name,
        };
        info!(name = %file.name, "url converted");
        self.files.insert(0, file.clone());
        self.persist(store)?;
        Ok(Some(file))
    }

    pub fn remove(&mut self, index: usize, store: &mut dyn KeyValueStore) -> AppResult<UploadedFile> {
        if index >= self.files.len() {
            return Err(unknown_file(index));
        }
        let removed = self.files.remove(index);
        self.persist(store)?;
        Ok(removed)
    }

    pub fn preview(&self, index: usize) -> AppResult<String> {
        let file = self.files.get(index).ok_or_else(|| unknown_file(index))?;
        Ok(format!("Opening preview for {}...", file.name))
    }

    pub fn download(&self, index: usize) -> AppResult<String> {
        let file = self.files.get(index).ok_or_else(|| unknown_file(index))?;
        if file.status != UploadStatus::Completed {
            return Err(AppError::validation(format!(
                "{} is not ready for download",
                file.name
            )));
        }
        Ok(format!("Downloading {}...", file.name))
    }

    fn persist(&self, store: &mut dyn KeyValueStore) -> AppResult<()> {
        store.save(UPLOADED_FILES_KEY, &self.files)
    }
}

fn unknown_file(index: usize) -> AppError {
    AppError::invalid_argument(format!("no file at position {}", index + 1))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{MAX_UPLOAD_BYTES, TickOutcome, UploadManager, UploadStatus, validate_upload};
    use crate::storage::MemoryStore;

    #[test]
    fn validation_checks_type_then_size() {
        assert_eq!(validate_upload("notes.PDF", 10).ok(), Some("application/pdf"));
        assert_eq!(
            validate_upload("song.mp3", 10).map_err(|err| err.to_string()),
            Err("song.mp3 is not a supported file type".to_string())
        );
        assert_eq!(
            validate_upload("big.epub", MAX_UPLOAD_BYTES + 1).map_err(|err| err.to_string()),
            Err("big.epub is too large (max 100MB)".to_string())
        );
        assert!(validate_upload("exact.txt", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn ticks_progress_until_completed() {
        let mut store = MemoryStore::default();
        let mut uploads = UploadManager::default();
        let id = uploads
            .accept("thesis.docx", 2048, &mut store, Utc::now())
            .expect("docx is accepted");
        assert_eq!(uploads.uploading_ids(), vec![id.clone()]);

        assert_eq!(
            uploads.tick_by(&id, 60.0, &mut store).expect("tick saves"),
            TickOutcome::Progressed(60.0)
        );
        assert_eq!(
            uploads.tick_by(&id, 45.0, &mut store).expect("tick saves"),
            TickOutcome::Completed("thesis.docx".to_string())
        );

        let file = &uploads.files()[0];
        assert_eq!(file.status, UploadStatus::Completed);
        assert_eq!(file.progress, 100.0);
        assert_eq!(
            file.converted_url.as_deref(),
            Some("https://example.com/converted/thesis.docx")
        );
        assert_eq!(
            uploads.tick_by(&id, 5.0, &mut store).expect("no-op tick"),
            TickOutcome::Stopped
        );

        let restored = UploadManager::restore(&store);
        assert_eq!(restored.files(), uploads.files());
    }

    #[test]
    fn removed_file_stops_ticking() {
        let mut store = MemoryStore::default();
        let mut uploads = UploadManager::default();
        let id = uploads
            .accept("a.pdf", 1, &mut store, Utc::now())
            .expect("pdf is accepted");
        uploads.remove(0, &mut store).expect("file exists");
        assert_eq!(
            uploads.tick_by(&id, 10.0, &mut store).expect("no-op tick"),
            TickOutcome::Stopped
        );
        assert!(uploads.remove(0, &mut store).is_err());
    }

    #[test]
    fn conversion_is_exclusive_and_names_file_after_host() {
        let mut store = MemoryStore::default();
        let mut uploads = UploadManager::default();

        assert_eq!(
            uploads
                .begin_conversion("not a url")
                .map_err(|err| err.to_string()),
            Err("Please enter a valid URL".to_string())
        );

        let ticket = uploads
            .begin_conversion("https://docs.rs/tokio")
            .expect("valid url");
        assert!(uploads.begin_conversion("https://crates.io").is_err());

        let file = uploads
            .complete_conversion(ticket, &mut store, Utc::now())
            .expect("conversion saves")
            .expect("ticket matches");
        assert_eq!(file.name, "docs.rs.pdf");
        assert_eq!(file.url.as_deref(), Some("https://docs.rs/tokio"));
        assert!((1_000_000..6_000_000).contains(&file.size));
        assert!(!uploads.is_converting());
        assert_eq!(
            uploads.download(0).expect("completed file"),
            "Downloading docs.rs.pdf..."
        );
    }

    #[test]
    fn download_requires_completed_file() {
        let mut store = MemoryStore::default();
        let mut uploads = UploadManager::default();
        uploads
            .accept("draft.txt", 10, &mut store, Utc::now())
            .expect("txt is accepted");
        assert!(uploads.download(0).is_err());
        assert_eq!(
            uploads.preview(0).expect("file exists"),
            "Opening preview for draft.txt..."
        );
    }
}
