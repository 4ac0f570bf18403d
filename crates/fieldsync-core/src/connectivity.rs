//! Connectivity state set by the host application.

use tokio::sync::watch;
use tracing::debug;

use crate::traits::{Connectivity, ConnectivityOracle};

/// A connectivity oracle driven by explicit calls.
///
/// Host applications forward platform reachability callbacks into
/// [`set_online`](Self::set_online); tests toggle it directly.
#[derive(Debug)]
pub struct ManualConnectivity {
    tx: watch::Sender<Connectivity>,
}

impl ManualConnectivity {
    pub fn new(initial: Connectivity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn online() -> Self {
        Self::new(Connectivity::Online)
    }

    pub fn offline() -> Self {
        Self::new(Connectivity::Offline)
    }

    /// Record a new state. Subscribers are only woken when it changes.
    pub fn set(&self, state: Connectivity) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            debug!(?state, "Connectivity changed");
        }
    }

    pub fn set_online(&self, online: bool) {
        self.set(Connectivity::from_online(online));
    }

    pub fn current(&self) -> Connectivity {
        *self.tx.borrow()
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::offline()
    }
}

impl ConnectivityOracle for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.current().is_online()
    }

    fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}
