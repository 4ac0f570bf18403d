//! REST-backed sync endpoint.

use async_trait::async_trait;
use tracing::{debug, instrument};

use fieldsync_core::error::UploadError;
use fieldsync_core::{EndpointUrl, Record, SyncEndpoint, UploadAck};

use crate::client::SyncClient;

/// Path prefix for record uploads.
const RECORDS: &str = "v1/records";

/// Uploads records with `PUT {base}/v1/records/{id}`.
///
/// The request is idempotent per record id, so a retried upload after a lost
/// acknowledgment is harmless.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: SyncClient,
}

impl HttpEndpoint {
    pub fn new(base: EndpointUrl) -> fieldsync_core::Result<Self> {
        Ok(Self {
            client: SyncClient::new(base)?,
        })
    }

    pub fn from_client(client: SyncClient) -> Self {
        Self { client }
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.with_token(token),
        }
    }

    pub fn url(&self) -> &EndpointUrl {
        self.client.base()
    }
}

#[async_trait]
impl SyncEndpoint for HttpEndpoint {
    #[instrument(skip(self, record), fields(id = %record.id, kind = record.payload.kind_label()))]
    async fn upload(&self, record: &Record) -> Result<UploadAck, UploadError> {
        let path = format!("{}/{}", RECORDS, record.id);
        let ack: UploadAck = self.client.put_json(&path, record).await?;
        debug!(remote_id = ?ack.remote_id, "Upload acknowledged");
        Ok(ack)
    }
}
