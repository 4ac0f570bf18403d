//! CLI endpoint wrapper.

use async_trait::async_trait;

use fieldsync_core::error::UploadError;
use fieldsync_core::{Record, SyncEndpoint, UploadAck};
use fieldsync_file::DirectoryEndpoint;
use fieldsync_http::HttpEndpoint;

/// Endpoint selected by `--endpoint`.
#[derive(Debug, Clone)]
pub enum CliEndpoint {
    /// No endpoint configured; every upload reports offline.
    Unconfigured,
    Directory(DirectoryEndpoint),
    Http(HttpEndpoint),
}

impl CliEndpoint {
    pub fn describe(&self) -> String {
        match self {
            CliEndpoint::Unconfigured => "none".to_string(),
            CliEndpoint::Directory(endpoint) => endpoint.root().display().to_string(),
            CliEndpoint::Http(endpoint) => endpoint.url().to_string(),
        }
    }
}

#[async_trait]
impl SyncEndpoint for CliEndpoint {
    async fn upload(&self, record: &Record) -> Result<UploadAck, UploadError> {
        match self {
            CliEndpoint::Unconfigured => Err(UploadError::Offline),
            CliEndpoint::Directory(endpoint) => endpoint.upload(record).await,
            CliEndpoint::Http(endpoint) => endpoint.upload(record).await,
        }
    }
}
