//! CLI connectivity wrapper.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use fieldsync_core::{Connectivity, ConnectivityOracle, ManualConnectivity};
use fieldsync_http::HttpProbe;

/// Reachability source matching the configured endpoint.
#[derive(Debug)]
pub enum CliConnectivity {
    /// Fixed state: offline without an endpoint, online for a local outbox.
    Manual(ManualConnectivity),
    /// Health checks against the HTTP backend.
    Probe(Arc<HttpProbe>),
}

impl CliConnectivity {
    /// Re-check reachability now, where that means anything.
    pub async fn refresh(&self) -> Connectivity {
        match self {
            CliConnectivity::Manual(manual) => manual.current(),
            CliConnectivity::Probe(probe) => probe.check().await,
        }
    }

    /// Start periodic checks. Fixed states have nothing to poll.
    pub fn spawn_polling(&self, interval: Duration) -> Option<JoinHandle<()>> {
        match self {
            CliConnectivity::Manual(_) => None,
            CliConnectivity::Probe(probe) => Some(probe.spawn(interval)),
        }
    }
}

impl ConnectivityOracle for CliConnectivity {
    fn is_online(&self) -> bool {
        match self {
            CliConnectivity::Manual(manual) => manual.is_online(),
            CliConnectivity::Probe(probe) => probe.is_online(),
        }
    }

    fn subscribe(&self) -> watch::Receiver<Connectivity> {
        match self {
            CliConnectivity::Manual(manual) => manual.subscribe(),
            CliConnectivity::Probe(probe) => probe.subscribe(),
        }
    }
}
