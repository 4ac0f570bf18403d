//! fieldsync-http - HTTP sync endpoint and reachability probe.

mod client;
mod endpoint;
mod probe;

pub use client::{DEFAULT_TIMEOUT, SyncClient};
pub use endpoint::HttpEndpoint;
pub use probe::{DEFAULT_PROBE_INTERVAL, HttpProbe};
