//! Record and sync bookkeeping types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::RecordId;

use super::RecordPayload;

/// A locally persisted record awaiting or past synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,

    /// True until the remote endpoint has acknowledged this record.
    pub sync_pending: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Domain data, opaque to the sync queue.
    pub payload: RecordPayload,
}

impl Record {
    /// Build a new record stamped with the current time.
    pub fn new(payload: RecordPayload, sync_pending: bool) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            sync_pending,
            created_at: now,
            updated_at: now,
            payload,
        }
    }

    /// Returns the owning report for entries.
    pub fn parent_id(&self) -> Option<&RecordId> {
        self.payload.parent_id()
    }

    pub fn status(&self) -> SyncStatus {
        if self.sync_pending {
            SyncStatus::Pending
        } else {
            SyncStatus::Synced
        }
    }

    /// Apply a mutation in place and bump `updated_at`.
    ///
    /// Returns `false`, leaving the record untouched, when a
    /// [`RecordUpdate::MarkSynced`] carries a stale version.
    pub fn apply(&mut self, update: &RecordUpdate) -> bool {
        match update {
            RecordUpdate::MarkSynced { version } => {
                if *version != self.updated_at {
                    return false;
                }
                self.sync_pending = false;
            }
            RecordUpdate::MarkPending => self.sync_pending = true,
            RecordUpdate::ReplacePayload(payload) => {
                self.payload = payload.clone();
                self.sync_pending = true;
            }
        }
        self.updated_at = Utc::now();
        true
    }

    /// Flush order: oldest first, ties broken by id.
    pub fn queue_order(a: &Record, b: &Record) -> Ordering {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Sync state of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation applied atomically by a record store.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordUpdate {
    /// Clear the pending flag after an acknowledged upload.
    ///
    /// `version` is the `updated_at` of the record that was uploaded. If the
    /// record changed since, the update is ignored and it stays pending.
    MarkSynced { version: DateTime<Utc> },
    /// Re-flag a record for upload.
    MarkPending,
    /// Replace the domain payload and flag the record for upload.
    ReplacePayload(RecordPayload),
}

impl RecordUpdate {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordUpdate::MarkSynced { .. } => "synced",
            RecordUpdate::MarkPending => "pending",
            RecordUpdate::ReplacePayload(_) => "edit",
        }
    }
}

/// Acknowledgment returned by a sync endpoint for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAck {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    /// Identifier assigned by the backend, if it keeps its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

impl UploadAck {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            received_at: None,
            remote_id: None,
        }
    }
}
