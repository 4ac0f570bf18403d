//! Tuning knobs for the sync queue.

use std::time::Duration;

/// When a freshly created record is first uploaded.
///
/// Records are always stored pending; only an acknowledgment clears the flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreationMode {
    /// Upload in the background right away when online at creation.
    #[default]
    Eager,
    /// Wait for the next flush.
    LocalFirst,
}

/// Bounded retry for transient upload failures within one flush.
///
/// The default makes a single attempt per flush; failed records wait for
/// the next connectivity event or retry tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per record per flush, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// One attempt, no backoff.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Doubling backoff starting at `initial_backoff`, capped at `max_backoff`.
    pub fn exponential(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff,
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Configuration for [`SyncQueueCoordinator`](super::SyncQueueCoordinator).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub creation_mode: CreationMode,
    /// Upper bound on simultaneous uploads during a flush.
    pub max_concurrent_uploads: usize,
    pub retry: RetryPolicy,
    /// Re-flush on this period while online. `None` disables the timer.
    pub retry_interval: Option<Duration>,
    /// Flush once when the connectivity watcher starts online.
    pub flush_on_start: bool,
}

impl SyncConfig {
    pub fn with_creation_mode(mut self, mode: CreationMode) -> Self {
        self.creation_mode = mode;
        self
    }

    pub fn with_max_concurrent_uploads(mut self, limit: usize) -> Self {
        self.max_concurrent_uploads = limit.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_retry_interval(mut self, interval: Option<Duration>) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn with_flush_on_start(mut self, flush: bool) -> Self {
        self.flush_on_start = flush;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            creation_mode: CreationMode::Eager,
            max_concurrent_uploads: 4,
            retry: RetryPolicy::none(),
            retry_interval: None,
            flush_on_start: true,
        }
    }
}
