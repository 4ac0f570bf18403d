//! Sync queue coordinator.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures_util::{StreamExt, stream};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::Result;
use crate::error::{Error, StorageError, UploadError};
use crate::record::{Record, RecordPayload, RecordUpdate, UploadAck};
use crate::traits::{ConnectivityOracle, RecordStore, SyncEndpoint};

use super::config::{CreationMode, SyncConfig};
use super::in_flight::InFlight;
use super::report::{FlushReport, Outcome};

/// Persists captured records locally and uploads them when online.
///
/// Creation never waits on the network. Records are stored pending and
/// uploaded by [`flush`](Self::flush), which runs on every offline→online
/// transition once
/// [`watch_connectivity`](Self::watch_connectivity) is started. At most one
/// upload per record id is in flight at any instant, however many flushes
/// overlap. An acknowledgment only clears the pending flag if the record
/// is unchanged since the upload read it.
///
/// Cloning is cheap; clones share state.
pub struct SyncQueueCoordinator<S, E, C> {
    inner: Arc<Inner<S, E, C>>,
}

struct Inner<S, E, C> {
    store: S,
    endpoint: E,
    connectivity: C,
    config: SyncConfig,
    in_flight: Arc<InFlight>,
    last_report: Mutex<Option<FlushReport>>,
}

impl<S, E, C> Clone for SyncQueueCoordinator<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, E, C> SyncQueueCoordinator<S, E, C>
where
    S: RecordStore + 'static,
    E: SyncEndpoint + 'static,
    C: ConnectivityOracle + 'static,
{
    pub fn new(store: S, endpoint: E, connectivity: C) -> Self {
        Self::with_config(store, endpoint, connectivity, SyncConfig::default())
    }

    pub fn with_config(store: S, endpoint: E, connectivity: C, config: SyncConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                endpoint,
                connectivity,
                config,
                in_flight: Arc::new(InFlight::default()),
                last_report: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn endpoint(&self) -> &E {
        &self.inner.endpoint
    }

    pub fn connectivity(&self) -> &C {
        &self.inner.connectivity
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Persist a new pending record and return it.
    ///
    /// In [`CreationMode::Eager`] an upload starts in the background when
    /// the oracle reports online; its acknowledgment clears the flag.
    /// Exactly one store write happens here; a store failure is returned
    /// as-is.
    #[instrument(skip(self, payload), fields(kind = payload.kind_label()))]
    pub async fn create_record(&self, payload: RecordPayload) -> Result<Record> {
        payload.validate()?;

        let record = Record::new(payload, true);
        self.inner.store.save(&record).await?;

        debug!(id = %record.id, "Created record");

        let eager = matches!(self.inner.config.creation_mode, CreationMode::Eager);
        if eager && self.inner.connectivity.is_online() {
            self.spawn_eager_upload(record.clone());
        }

        Ok(record)
    }

    /// Snapshot of records still waiting for an acknowledgment.
    pub async fn get_pending_records(&self) -> Result<Vec<Record>> {
        self.inner.store.query_pending().await
    }

    /// Start a flush in the background.
    ///
    /// Call this from the oracle's offline→online notification. The handle
    /// resolves to the report, or `None` if the pending set could not be read.
    pub fn on_connectivity_restored(&self) -> JoinHandle<Option<FlushReport>> {
        let this = self.clone();
        tokio::spawn(async move {
            match this.flush().await {
                Ok(report) => Some(report),
                Err(e) => {
                    error!(error = %e, "Flush failed");
                    None
                }
            }
        })
    }

    /// Upload every pending record once.
    ///
    /// Per-record failures leave that record pending and do not stop the
    /// pass. Only a failure to read the pending set is returned as an error.
    #[instrument(skip(self))]
    pub async fn flush(&self) -> Result<FlushReport> {
        let started_at = Utc::now();

        let mut pending = self.inner.store.query_pending().await?;
        pending.sort_by(Record::queue_order);
        let attempted = pending.len();

        if attempted == 0 {
            debug!("Nothing to flush");
        } else {
            info!(count = attempted, "Flushing pending records");
        }

        let limit = self.inner.config.max_concurrent_uploads.max(1);
        let outcomes: Vec<Outcome> = stream::iter(pending)
            .map(|record| {
                let inner = Arc::clone(&self.inner);
                async move { inner.sync_one(record).await }
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        let report = FlushReport::from_outcomes(started_at, attempted, outcomes);

        if attempted > 0 {
            info!(
                synced = report.synced.len(),
                failed = report.failed.len(),
                skipped = report.skipped.len(),
                "Flush finished"
            );
        }

        *self
            .inner
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());

        Ok(report)
    }

    /// Flush on every offline→online transition until the oracle goes away.
    ///
    /// With [`SyncConfig::retry_interval`] set, also re-flushes on that
    /// period while online.
    pub fn watch_connectivity(&self) -> JoinHandle<()> {
        let this = self.clone();
        let mut rx = self.inner.connectivity.subscribe();

        tokio::spawn(async move {
            let mut last = *rx.borrow_and_update();
            let retry_interval = this.inner.config.retry_interval;

            if last.is_online() && this.inner.config.flush_on_start {
                this.on_connectivity_restored();
            }

            loop {
                let changed = match retry_interval {
                    Some(period) => tokio::select! {
                        res = rx.changed() => Some(res),
                        _ = tokio::time::sleep(period) => None,
                    },
                    None => Some(rx.changed().await),
                };

                match changed {
                    Some(Ok(())) => {
                        let state = *rx.borrow_and_update();
                        if state.is_online() && !last.is_online() {
                            info!("Connectivity restored");
                            this.on_connectivity_restored();
                        } else if !state.is_online() && last.is_online() {
                            info!("Connectivity lost");
                        }
                        last = state;
                    }
                    Some(Err(_)) => {
                        debug!("Connectivity oracle closed");
                        break;
                    }
                    None => {
                        if last.is_online() {
                            debug!("Retry tick");
                            this.on_connectivity_restored();
                        }
                    }
                }
            }
        })
    }

    /// The most recent flush report, if any flush has run.
    pub fn last_report(&self) -> Option<FlushReport> {
        self.inner
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of uploads currently in progress.
    pub fn uploads_in_flight(&self) -> usize {
        self.inner.in_flight.len()
    }

    /// Wait until no upload is in progress.
    pub async fn wait_idle(&self) {
        self.inner.in_flight.wait_idle().await;
    }

    fn spawn_eager_upload(&self, record: Record) {
        // Claimed before spawning so `wait_idle` covers the task.
        let Some(claim) = self.inner.in_flight.try_claim(&record.id) else {
            return;
        };
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let _claim = claim;
            if let Err(e) = inner.upload_with_retry(&record).await {
                warn!(id = %record.id, error = %e, "Eager upload failed, queued for next flush");
                return;
            }
            match inner.mark_synced(&record).await {
                Ok(true) => debug!(id = %record.id, "Eager upload acknowledged"),
                Ok(false) => debug!(id = %record.id, "Record changed during eager upload, stays pending"),
                Err(Error::Storage(StorageError::NotFound { .. })) => {
                    debug!(id = %record.id, "Record deleted before eager upload finished");
                }
                Err(e) => {
                    error!(id = %record.id, error = %e, "Upload acknowledged but store update failed");
                }
            }
        });
    }
}

impl<S, E, C> Inner<S, E, C>
where
    S: RecordStore,
    E: SyncEndpoint,
    C: ConnectivityOracle,
{
    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn sync_one(&self, record: Record) -> Outcome {
        let Some(_claim) = self.in_flight.try_claim(&record.id) else {
            debug!("Upload already in flight");
            return Outcome::Skipped(record.id);
        };

        // The snapshot may be stale: another pass could have finished this
        // record between the query and the claim.
        let current = match self.store.get(&record.id).await {
            Ok(Some(current)) if current.sync_pending => current,
            Ok(_) => {
                debug!("Record no longer pending");
                return Outcome::Skipped(record.id);
            }
            Err(e) => {
                warn!(error = %e, "Failed to re-read record");
                return Outcome::Failed(record.id);
            }
        };

        match self.upload_with_retry(&current).await {
            Ok(_) => match self.mark_synced(&current).await {
                Ok(true) => {
                    debug!("Record synced");
                    Outcome::Synced(current.id)
                }
                Ok(false) => {
                    debug!("Record changed during upload, stays pending");
                    Outcome::Skipped(current.id)
                }
                Err(e) => {
                    error!(error = %e, "Upload acknowledged but store update failed");
                    Outcome::Failed(current.id)
                }
            },
            Err(e) => {
                warn!(error = %e, "Upload failed, record stays pending");
                Outcome::Failed(current.id)
            }
        }
    }

    /// Clear the pending flag if `uploaded` is still the stored version.
    ///
    /// Returns `false` when a local change landed during the upload.
    async fn mark_synced(&self, uploaded: &Record) -> Result<bool> {
        let stored = self
            .store
            .update(
                &uploaded.id,
                RecordUpdate::MarkSynced {
                    version: uploaded.updated_at,
                },
            )
            .await?;
        Ok(!stored.sync_pending)
    }

    async fn upload_with_retry(&self, record: &Record) -> std::result::Result<UploadAck, UploadError> {
        let policy = &self.config.retry;
        let mut attempt = 1;

        loop {
            if !self.connectivity.is_online() {
                return Err(UploadError::Offline);
            }

            match self.endpoint.upload(record).await {
                Ok(ack) if ack.id == record.id => return Ok(ack),
                Ok(ack) => {
                    return Err(UploadError::Other {
                        message: format!("acknowledgment for {} does not match {}", ack.id, record.id),
                    });
                }
                Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                    let delay = policy.backoff(attempt);
                    debug!(attempt, ?delay, error = %e, "Transient upload failure, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
