//! Core identifier types.
//!
//! These types validate at construction time so a malformed id or URL
//! never reaches a store path or an HTTP request.

mod endpoint_url;
mod record_id;

pub use endpoint_url::EndpointUrl;
pub use record_id::RecordId;
