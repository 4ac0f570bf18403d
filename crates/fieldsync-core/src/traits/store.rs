//! Local record store trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::record::{Record, RecordUpdate};
use crate::types::RecordId;

/// Durable keyed storage for records.
///
/// `update` must be atomic with respect to readers: nobody observes a
/// half-applied mutation.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or overwrite a record.
    async fn save(&self, record: &Record) -> Result<()>;

    /// Fetch a record by id.
    async fn get(&self, id: &RecordId) -> Result<Option<Record>>;

    /// All records with `sync_pending == true`, oldest first (ties by id).
    async fn query_pending(&self) -> Result<Vec<Record>>;

    /// Apply a mutation atomically and return the record as stored.
    ///
    /// Implementations must check and apply in one step, so a
    /// [`RecordUpdate::MarkSynced`] racing a local edit is dropped.
    ///
    /// Fails with [`StorageError::NotFound`](crate::error::StorageError::NotFound)
    /// if the record does not exist.
    async fn update(&self, id: &RecordId, update: RecordUpdate) -> Result<Record>;

    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Remove a record. Removing a missing record is not an error.
    async fn delete(&self, id: &RecordId) -> Result<()>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn save(&self, record: &Record) -> Result<()> {
        (**self).save(record).await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Record>> {
        (**self).get(id).await
    }

    async fn query_pending(&self) -> Result<Vec<Record>> {
        (**self).query_pending().await
    }

    async fn update(&self, id: &RecordId, update: RecordUpdate) -> Result<Record> {
        (**self).update(id, update).await
    }

    async fn list(&self) -> Result<Vec<Record>> {
        (**self).list().await
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        (**self).delete(id).await
    }
}
