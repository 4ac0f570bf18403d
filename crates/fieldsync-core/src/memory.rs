//! In-memory record store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::Result;
use crate::error::StorageError;
use crate::record::{Record, RecordUpdate};
use crate::traits::RecordStore;
use crate::types::RecordId;

/// A volatile [`RecordStore`] backed by a map.
///
/// Useful for embedding hosts that persist elsewhere, and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn sorted(mut records: Vec<Record>) -> Vec<Record> {
        records.sort_by(Record::queue_order);
        records
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, record: &Record) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Record>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn query_pending(&self) -> Result<Vec<Record>> {
        let records = self.records.read().await;
        Ok(Self::sorted(
            records.values().filter(|r| r.sync_pending).cloned().collect(),
        ))
    }

    #[instrument(skip(self, update), fields(update = update.as_str()))]
    async fn update(&self, id: &RecordId, update: RecordUpdate) -> Result<Record> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound { id: id.clone() })?;
        if record.apply(&update) {
            debug!("Updated record");
        } else {
            debug!("Record changed since upload, left pending");
        }
        Ok(record.clone())
    }

    async fn list(&self) -> Result<Vec<Record>> {
        let records = self.records.read().await;
        Ok(Self::sorted(records.values().cloned().collect()))
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
