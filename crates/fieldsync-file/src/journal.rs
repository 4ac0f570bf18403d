//! Live tail of the store journal.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use fieldsync_core::Result;
use fieldsync_core::error::StorageError;

use crate::store::{FileStore, JournalEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Stream of journal events appended to a [`FileStore`].
///
/// The file is watched for changes and also polled, since not every
/// platform delivers change notifications for appends.
pub struct FileJournal {
    inner: Pin<Box<dyn Stream<Item = Result<JournalEvent>> + Send>>,
}

impl FileJournal {
    /// Follow new events, starting at the current end of the journal.
    pub fn follow(store: &FileStore) -> Result<Self> {
        Self::open(store, false)
    }

    /// Replay the whole journal, then follow new events.
    pub fn replay(store: &FileStore) -> Result<Self> {
        Self::open(store, true)
    }

    fn open(store: &FileStore, from_start: bool) -> Result<Self> {
        let root = store.root().to_path_buf();
        let journal_path = store.journal_path();

        std::fs::create_dir_all(&root).map_err(StorageError::from)?;

        let initial_pos = if from_start {
            0
        } else {
            std::fs::metadata(&journal_path)
                .map(|m| m.len())
                .unwrap_or(0)
        };

        let (tx, mut rx) = mpsc::channel::<Result<JournalEvent>>(100);
        let (wake_tx, mut wake_rx) = mpsc::channel::<()>(1);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else {
                return;
            };
            if !matches!(
                event.kind,
                notify::EventKind::Modify(_) | notify::EventKind::Create(_)
            ) {
                return;
            }
            let is_journal = event
                .paths
                .iter()
                .any(|p| p.file_name().is_some_and(|n| n == "journal.jsonl"));
            if is_journal {
                // A pending wake-up already covers this change.
                let _ = wake_tx.try_send(());
            }
        })
        .map_err(|e| StorageError::Io {
            message: format!("failed to create file watcher: {}", e),
        })?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|e| StorageError::Io {
                message: format!("failed to watch {}: {}", root.display(), e),
            })?;

        tokio::spawn(async move {
            let _watcher = watcher;
            let mut position = initial_pos;
            let mut interval = tokio::time::interval(POLL_INTERVAL);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    Some(()) = wake_rx.recv() => {}
                }

                if tx.is_closed() {
                    debug!("Journal subscriber dropped");
                    return;
                }

                match read_new_events(&journal_path, position) {
                    Ok((events, next)) => {
                        position = next;
                        for event in events {
                            if tx.send(Ok(event)).await.is_err() {
                                debug!("Journal subscriber dropped");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read journal");
                        if tx.send(Err(e)).await.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        let stream = async_stream::stream! {
            while let Some(event) = rx.recv().await {
                yield event;
            }
        };

        Ok(Self {
            inner: Box::pin(stream),
        })
    }
}

impl Stream for FileJournal {
    type Item = Result<JournalEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Parse complete lines after `position`; returns the events and the new offset.
///
/// A trailing partial line is left for the next read.
fn read_new_events(path: &Path, position: u64) -> Result<(Vec<JournalEvent>, u64)> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(e) => return Err(StorageError::from(e).into()),
    };

    let len = file.metadata().map_err(StorageError::from)?.len();
    // Truncated or replaced: start over.
    let position = if len < position { 0 } else { position };

    file.seek(SeekFrom::Start(position))
        .map_err(StorageError::from)?;
    let mut buf = String::new();
    file.read_to_string(&mut buf).map_err(StorageError::from)?;

    let Some(last_newline) = buf.rfind('\n') else {
        return Ok((Vec::new(), position));
    };
    let complete = &buf[..=last_newline];

    let events = complete
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<JournalEvent>(line) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, "Skipping malformed journal line");
                None
            }
        })
        .collect();

    Ok((events, position + complete.len() as u64))
}
