//! fieldsync-file - Filesystem-backed record store and directory endpoint.

mod endpoint;
mod journal;
mod store;

pub use endpoint::DirectoryEndpoint;
pub use journal::FileJournal;
pub use store::{FileStore, JournalEvent, JournalOp};
