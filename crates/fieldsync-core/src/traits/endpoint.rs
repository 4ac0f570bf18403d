//! Remote sync endpoint trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::UploadError;
use crate::record::{Record, UploadAck};

/// Accepts uploads of single records.
///
/// Uploads are keyed by record id; sending the same record twice must be
/// harmless on the receiving side.
#[async_trait]
pub trait SyncEndpoint: Send + Sync {
    /// Upload one record and wait for the acknowledgment.
    async fn upload(&self, record: &Record) -> Result<UploadAck, UploadError>;
}

#[async_trait]
impl<T: SyncEndpoint + ?Sized> SyncEndpoint for Arc<T> {
    async fn upload(&self, record: &Record) -> Result<UploadAck, UploadError> {
        (**self).upload(record).await
    }
}
