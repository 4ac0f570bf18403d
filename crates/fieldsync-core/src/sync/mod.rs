//! The offline capture-and-sync queue.

mod config;
mod coordinator;
mod in_flight;
mod report;

pub use config::{CreationMode, RetryPolicy, SyncConfig};
pub use coordinator::SyncQueueCoordinator;
pub use report::FlushReport;
