//! Connectivity oracle trait.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Network reachability as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        self == Connectivity::Online
    }

    pub fn from_online(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

/// Reports whether the device can currently reach the backend.
///
/// `is_online` must not block. Subscribers receive the current state and
/// are woken on every change; implementations only publish actual changes,
/// so an offline→online transition is observed once.
pub trait ConnectivityOracle: Send + Sync {
    /// Current state, without waiting on the network.
    fn is_online(&self) -> bool;

    /// Subscribe to state changes.
    fn subscribe(&self) -> watch::Receiver<Connectivity>;
}

impl<T: ConnectivityOracle + ?Sized> ConnectivityOracle for Arc<T> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }

    fn subscribe(&self) -> watch::Receiver<Connectivity> {
        (**self).subscribe()
    }
}
