//! Filesystem storage for records.
//!
//! ## Directory Structure
//!
//! ```text
//! $ROOT/
//! ├── records/
//! │   └── <id>.json
//! ├── journal.jsonl
//! └── store.lock
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use fieldsync_core::error::StorageError;
use fieldsync_core::{Record, RecordId, RecordStore, RecordUpdate, Result};

/// An entry in the store journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEvent {
    /// The affected record.
    pub id: RecordId,
    pub time: DateTime<Utc>,
    pub op: JournalOp,
}

/// The kind of store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalOp {
    /// A record was written.
    Save,
    /// A record's upload was acknowledged.
    Synced,
    /// A record was re-flagged for upload.
    Pending,
    /// A record's payload was replaced.
    Edit,
    /// A record was removed.
    Delete,
}

impl JournalOp {
    fn for_update(update: &RecordUpdate) -> Self {
        match update {
            RecordUpdate::MarkSynced { .. } => JournalOp::Synced,
            RecordUpdate::MarkPending => JournalOp::Pending,
            RecordUpdate::ReplacePayload(_) => JournalOp::Edit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalOp::Save => "save",
            JournalOp::Synced => "synced",
            JournalOp::Pending => "pending",
            JournalOp::Edit => "edit",
            JournalOp::Delete => "delete",
        }
    }
}

/// Filesystem-backed [`RecordStore`].
///
/// Each record is one JSON file, replaced atomically on every write.
/// Mutations are serialized within the process by a mutex and across
/// processes by an exclusive lock on `store.lock`, so a read-modify-write
/// never interleaves with another. File I/O and lock waits run on the
/// blocking thread pool.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.records_dir().join(format!("{}.json", id))
    }

    pub(crate) fn journal_path(&self) -> PathBuf {
        self.root.join("journal.jsonl")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    /// Take the cross-process write lock. Released when the file is dropped.
    fn lock(&self) -> Result<File> {
        fs::create_dir_all(&self.root).map_err(StorageError::from)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(StorageError::from)?;

        lock_file.lock_exclusive().map_err(StorageError::from)?;
        Ok(lock_file)
    }

    /// Run `f` while holding the cross-process write lock.
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_file = self.lock()?;
        let value = f()?;
        lock_file.unlock().map_err(StorageError::from)?;
        Ok(value)
    }

    /// Run blocking file work off the async runtime.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(FileStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || f(this))
            .await
            .map_err(|e| StorageError::Io {
                message: format!("store task failed: {}", e),
            })?
    }

    fn write_record(&self, record: &Record) -> Result<()> {
        let path = self.record_path(&record.id);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::from)?;
        }

        let content = serde_json::to_string_pretty(record).map_err(StorageError::from)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).map_err(StorageError::from)?;
        fs::rename(&temp_path, &path).map_err(StorageError::from)?;

        Ok(())
    }

    fn read_record(&self, path: &Path) -> Result<Record> {
        let content = fs::read_to_string(path).map_err(StorageError::from)?;
        let record = serde_json::from_str(&content).map_err(StorageError::from)?;
        Ok(record)
    }

    fn read_all(&self) -> Result<Vec<Record>> {
        let dir = self.records_dir();

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();

        for entry in fs::read_dir(&dir).map_err(StorageError::from)? {
            let entry = entry.map_err(StorageError::from)?;
            let path = entry.path();

            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            match self.read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
            }
        }

        records.sort_by(Record::queue_order);
        Ok(records)
    }

    fn append_journal(&self, id: &RecordId, op: JournalOp) -> Result<()> {
        let event = JournalEvent {
            id: id.clone(),
            time: Utc::now(),
            op,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.journal_path())
            .map_err(StorageError::from)?;

        let line = serde_json::to_string(&event).map_err(StorageError::from)?;

        writeln!(file, "{}", line).map_err(StorageError::from)?;
        file.sync_data().map_err(StorageError::from)?;

        Ok(())
    }

    /// Read every journal event written so far.
    pub fn read_journal(&self) -> Result<Vec<JournalEvent>> {
        let path = self.journal_path();

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(StorageError::from)?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn save(&self, record: &Record) -> Result<()> {
        let _guard = self.writer.lock().await;
        let record = record.clone();

        self.blocking(move |store| {
            store.locked(|| {
                store.write_record(&record)?;
                store.append_journal(&record.id, JournalOp::Save)
            })
        })
        .await?;

        debug!("Saved record");
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Record>> {
        let id = id.clone();

        self.blocking(move |store| {
            let path = store.record_path(&id);
            if !path.exists() {
                return Ok(None);
            }
            store.read_record(&path).map(Some)
        })
        .await
    }

    async fn query_pending(&self) -> Result<Vec<Record>> {
        let mut records = self.blocking(|store| store.read_all()).await?;
        records.retain(|r| r.sync_pending);
        Ok(records)
    }

    #[instrument(skip(self, update), fields(update = update.as_str()))]
    async fn update(&self, id: &RecordId, update: RecordUpdate) -> Result<Record> {
        let _guard = self.writer.lock().await;
        let id = id.clone();

        let (record, applied) = self
            .blocking(move |store| {
                store.locked(|| {
                    let path = store.record_path(&id);
                    if !path.exists() {
                        return Err(StorageError::NotFound { id: id.clone() }.into());
                    }

                    let mut record = store.read_record(&path)?;
                    let applied = record.apply(&update);
                    if applied {
                        store.write_record(&record)?;
                        store.append_journal(&id, JournalOp::for_update(&update))?;
                    }
                    Ok((record, applied))
                })
            })
            .await?;

        if applied {
            debug!("Updated record");
        } else {
            debug!("Record changed since upload, left pending");
        }
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<Record>> {
        self.blocking(|store| store.read_all()).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<()> {
        let _guard = self.writer.lock().await;
        let id = id.clone();

        let removed = self
            .blocking(move |store| {
                store.locked(|| {
                    let path = store.record_path(&id);
                    if !path.exists() {
                        return Ok(false);
                    }
                    fs::remove_file(&path).map_err(StorageError::from)?;
                    store.append_journal(&id, JournalOp::Delete)?;
                    Ok(true)
                })
            })
            .await?;

        if removed {
            debug!("Deleted record");
        }
        Ok(())
    }
}
