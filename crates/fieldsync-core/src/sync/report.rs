//! Flush outcome summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::RecordId;

/// What happened to one record during a flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Synced(RecordId),
    Failed(RecordId),
    /// Another upload held the record, it was no longer pending, or it
    /// changed while uploading.
    Skipped(RecordId),
}

/// Summary of one flush pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlushReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Pending records in the snapshot.
    pub attempted: usize,
    pub synced: Vec<RecordId>,
    pub failed: Vec<RecordId>,
    pub skipped: Vec<RecordId>,
}

impl FlushReport {
    pub(crate) fn from_outcomes(
        started_at: DateTime<Utc>,
        attempted: usize,
        outcomes: Vec<Outcome>,
    ) -> Self {
        let mut report = Self {
            started_at,
            finished_at: Utc::now(),
            attempted,
            synced: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Synced(id) => report.synced.push(id),
                Outcome::Failed(id) => report.failed.push(id),
                Outcome::Skipped(id) => report.skipped.push(id),
            }
        }
        report
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
