//! Per-record upload claims.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::types::RecordId;

/// Ids with an upload currently in progress.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    ids: Mutex<HashSet<RecordId>>,
    idle: Notify,
}

impl InFlight {
    fn ids(&self) -> MutexGuard<'_, HashSet<RecordId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `id`, or `None` if another upload already holds it.
    pub(crate) fn try_claim(self: &Arc<Self>, id: &RecordId) -> Option<Claim> {
        if self.ids().insert(id.clone()) {
            Some(Claim {
                owner: Arc::clone(self),
                id: id.clone(),
            })
        } else {
            None
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids().len()
    }

    /// Resolves once no claims are held.
    pub(crate) async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.ids().is_empty() {
                return;
            }
            notified.await;
        }
    }
}

/// Held for the duration of one upload; released on drop.
#[derive(Debug)]
pub(crate) struct Claim {
    owner: Arc<InFlight>,
    id: RecordId,
}

impl Drop for Claim {
    fn drop(&mut self) {
        let now_idle = {
            let mut ids = self.owner.ids();
            ids.remove(&self.id);
            ids.is_empty()
        };
        if now_idle {
            self.owner.idle.notify_waiters();
        }
    }
}
