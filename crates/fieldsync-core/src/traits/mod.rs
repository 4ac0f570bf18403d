//! Seams to the collaborators the sync queue depends on.

mod connectivity;
mod endpoint;
mod store;

pub use connectivity::{Connectivity, ConnectivityOracle};
pub use endpoint::SyncEndpoint;
pub use store::RecordStore;
