//! Sync endpoint that delivers records into a local directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use fieldsync_core::error::UploadError;
use fieldsync_core::{Record, RecordId, SyncEndpoint, UploadAck};

/// Uploads records as JSON files under `<root>/uploads/`.
///
/// Useful as an outbox for another process, and for running the queue end
/// to end without a backend. Re-uploading a record overwrites its file.
#[derive(Debug, Clone)]
pub struct DirectoryEndpoint {
    root: PathBuf,
}

impl DirectoryEndpoint {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn upload_path(&self, id: &RecordId) -> PathBuf {
        self.uploads_dir().join(format!("{}.json", id))
    }

    /// Records delivered so far.
    pub fn delivered(&self) -> std::io::Result<Vec<RecordId>> {
        let dir = self.uploads_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<RecordId> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| RecordId::new(stem).ok())
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn write(&self, record: &Record) -> Result<(), UploadError> {
        let dir = self.uploads_dir();
        fs::create_dir_all(&dir).map_err(|e| connection(&dir, e))?;

        let json = serde_json::to_string_pretty(record).map_err(|e| UploadError::Other {
            message: format!("failed to encode record: {}", e),
        })?;

        let path = self.upload_path(&record.id);
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| connection(&temp_path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| connection(&temp_path, e))?;
        file.sync_all().map_err(|e| connection(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| connection(&path, e))?;

        Ok(())
    }
}

fn connection(path: &Path, err: std::io::Error) -> UploadError {
    UploadError::Connection {
        message: format!("{}: {}", path.display(), err),
    }
}

#[async_trait]
impl SyncEndpoint for DirectoryEndpoint {
    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn upload(&self, record: &Record) -> Result<UploadAck, UploadError> {
        let this = self.clone();
        let record = record.clone();
        let id = record.id.clone();

        tokio::task::spawn_blocking(move || this.write(&record))
            .await
            .map_err(|e| UploadError::Other {
                message: format!("upload task failed: {}", e),
            })??;

        debug!("Delivered record to directory");

        Ok(UploadAck {
            id,
            received_at: Some(Utc::now()),
            remote_id: None,
        })
    }
}
