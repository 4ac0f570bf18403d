//! fieldsync-core - Offline capture-and-sync queue for field reporting.
//!
//! Records (inspection reports and captured evidence entries) are written to
//! a local store first and uploaded to a remote endpoint when connectivity
//! allows. The [`SyncQueueCoordinator`] owns that flow; storage, transport
//! and reachability are injected through the traits in [`traits`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fieldsync_core::{
//!     ManualConnectivity, MemoryStore, RecordPayload, Report, SyncEndpoint,
//!     SyncQueueCoordinator,
//! };
//!
//! # async fn example(endpoint: impl SyncEndpoint + 'static) -> fieldsync_core::Result<()> {
//! let connectivity = Arc::new(ManualConnectivity::offline());
//! let queue = SyncQueueCoordinator::new(MemoryStore::new(), endpoint, connectivity.clone());
//! queue.watch_connectivity();
//!
//! let record = queue
//!     .create_record(RecordPayload::Report(Report::new("Roof inspection")))
//!     .await?;
//! assert!(record.sync_pending);
//!
//! // Uploads start in the background.
//! connectivity.set_online(true);
//! # Ok(())
//! # }
//! ```

pub mod connectivity;
pub mod error;
pub mod memory;
pub mod record;
pub mod sync;
pub mod traits;
pub mod types;

pub use connectivity::ManualConnectivity;
pub use error::Error;
pub use memory::MemoryStore;
pub use record::{
    Entry, EntryKind, GeoPoint, Record, RecordPayload, RecordUpdate, Report, ReportStatus,
    SyncStatus, UploadAck,
};
pub use sync::{CreationMode, FlushReport, RetryPolicy, SyncConfig, SyncQueueCoordinator};
pub use traits::{Connectivity, ConnectivityOracle, RecordStore, SyncEndpoint};
pub use types::{EndpointUrl, RecordId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
