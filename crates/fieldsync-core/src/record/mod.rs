//! Records: the unit the sync queue persists and uploads.

mod payload;
mod types;

pub use payload::{Entry, EntryKind, GeoPoint, RecordPayload, Report, ReportStatus};
pub use types::{Record, RecordUpdate, SyncStatus, UploadAck};
