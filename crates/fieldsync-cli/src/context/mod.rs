//! Data directory, endpoint and queue wiring shared by commands.

mod connectivity;
mod endpoint;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use tracing::debug;

use fieldsync_core::{
    CreationMode, EndpointUrl, ManualConnectivity, RecordId, SyncConfig, SyncQueueCoordinator,
};
use fieldsync_file::{DirectoryEndpoint, FileStore};
use fieldsync_http::{HttpEndpoint, HttpProbe, SyncClient};

pub use connectivity::CliConnectivity;
pub use endpoint::CliEndpoint;

/// Timeout for a single reachability check.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// The coordinator as the CLI assembles it.
pub type Queue = SyncQueueCoordinator<FileStore, CliEndpoint, CliConnectivity>;

/// Global options resolved lazily per command.
#[derive(Debug)]
pub struct Context {
    data_dir: Option<PathBuf>,
    endpoint: Option<String>,
    token: Option<String>,
}

impl Context {
    pub fn new(data_dir: Option<PathBuf>, endpoint: Option<String>, token: Option<String>) -> Self {
        Self {
            data_dir,
            endpoint,
            token,
        }
    }

    /// The data directory, created if missing.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("", "", "fieldsync")
                .context("Could not determine data directory")?
                .data_dir()
                .to_path_buf(),
        };

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(dir)
    }

    pub fn store(&self) -> Result<FileStore> {
        Ok(FileStore::new(self.data_dir()?))
    }

    pub fn endpoint_url(&self) -> Result<Option<EndpointUrl>> {
        self.endpoint
            .as_deref()
            .map(|s| EndpointUrl::new(s).context("Invalid endpoint URL"))
            .transpose()
    }

    /// Build a coordinator over the local store.
    ///
    /// Records are always created pending; uploads happen on `sync`. Without
    /// an endpoint the queue is permanently offline.
    pub fn queue(&self, config: SyncConfig) -> Result<Queue> {
        let store = self.store()?;
        let config = config.with_creation_mode(CreationMode::LocalFirst);

        let (endpoint, connectivity) = match self.endpoint_url()? {
            None => (
                CliEndpoint::Unconfigured,
                CliConnectivity::Manual(ManualConnectivity::offline()),
            ),
            Some(url) if url.is_local() => {
                let path = url
                    .to_file_path()
                    .context("Failed to convert file:// URL to path")?;
                debug!(path = %path.display(), "Using directory endpoint");
                (
                    CliEndpoint::Directory(DirectoryEndpoint::new(path)),
                    CliConnectivity::Manual(ManualConnectivity::online()),
                )
            }
            Some(url) => {
                debug!(%url, "Using HTTP endpoint");
                let mut client =
                    SyncClient::new(url.clone()).context("Failed to create HTTP client")?;
                if let Some(token) = &self.token {
                    client = client.with_token(token.clone());
                }
                let probe = HttpProbe::new(url, PROBE_TIMEOUT)
                    .context("Failed to create reachability probe")?;
                (
                    CliEndpoint::Http(HttpEndpoint::from_client(client)),
                    CliConnectivity::Probe(Arc::new(probe)),
                )
            }
        };

        Ok(SyncQueueCoordinator::with_config(
            store,
            endpoint,
            connectivity,
            config,
        ))
    }
}

/// Parse a record id argument.
pub fn parse_id(s: &str) -> Result<RecordId> {
    RecordId::new(s).with_context(|| format!("Invalid record id '{}'", s))
}
