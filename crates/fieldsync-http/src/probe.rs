//! Reachability probe that polls the sync API health check.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use fieldsync_core::{Connectivity, ConnectivityOracle, EndpointUrl};

use crate::client::SyncClient;

const HEALTH: &str = "v1/health";

/// Default time between health checks.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(15);

/// A [`ConnectivityOracle`] backed by `GET {base}/v1/health`.
///
/// Starts offline. Any 2xx response means online; anything else, including
/// a transport failure, means offline.
#[derive(Debug)]
pub struct HttpProbe {
    client: SyncClient,
    tx: watch::Sender<Connectivity>,
}

impl HttpProbe {
    pub fn new(base: EndpointUrl, timeout: Duration) -> fieldsync_core::Result<Self> {
        Ok(Self::from_client(SyncClient::with_timeout(base, timeout)?))
    }

    pub fn from_client(client: SyncClient) -> Self {
        let (tx, _rx) = watch::channel(Connectivity::Offline);
        Self { client, tx }
    }

    /// Run one health check and publish the result.
    #[instrument(skip(self), fields(base = %self.client.base()))]
    pub async fn check(&self) -> Connectivity {
        let state = match self.client.get_status(HEALTH).await {
            Ok(status) if status.is_success() => Connectivity::Online,
            Ok(status) => {
                debug!(%status, "Health check refused");
                Connectivity::Offline
            }
            Err(e) => {
                debug!(error = %e, "Health check failed");
                Connectivity::Offline
            }
        };

        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            info!(?state, "Reachability changed");
        }

        state
    }

    /// Check on every `interval` tick until the probe is dropped.
    pub fn spawn(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let probe: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let Some(probe) = probe.upgrade() else {
                    debug!("Probe dropped, stopping");
                    break;
                };
                probe.check().await;
            }
        })
    }
}

impl ConnectivityOracle for HttpProbe {
    fn is_online(&self) -> bool {
        self.tx.borrow().is_online()
    }

    fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}
