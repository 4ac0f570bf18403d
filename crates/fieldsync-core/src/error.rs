//! Error types for fieldsync.
//!
//! Errors are split by where they occur: local persistence, remote upload,
//! and input validation. Creation-path errors are returned to the caller;
//! upload errors are absorbed per record by the flush routine.

use std::fmt;
use thiserror::Error;

use crate::types::RecordId;

/// The unified error type for fieldsync operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Local persistence failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote upload failed.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Input validation errors (invalid id, URL, payload).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

/// Local record store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or device I/O failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A record could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// No record exists with the given id.
    #[error("record {id} not found")]
    NotFound { id: RecordId },

    /// The backing store refused the write.
    #[error("write rejected: {message}")]
    Rejected { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Remote upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The device is offline; no attempt was made.
    #[error("offline")]
    Offline,

    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The endpoint answered but refused the record.
    #[error("rejected: {0}")]
    Rejected(RejectedUpload),

    /// Anything else the transport reports.
    #[error("{message}")]
    Other { message: String },
}

impl UploadError {
    /// Returns true if retrying the same upload may succeed.
    ///
    /// Connection failures, timeouts, `408`, `429` and `5xx` rejections are
    /// transient. Other `4xx` rejections are not.
    pub fn is_transient(&self) -> bool {
        match self {
            UploadError::Offline | UploadError::Connection { .. } | UploadError::Timeout { .. } => {
                true
            }
            UploadError::Rejected(rejected) => rejected.is_transient(),
            UploadError::Other { .. } => false,
        }
    }
}

/// An upload refused by the remote endpoint.
#[derive(Debug, Clone)]
pub struct RejectedUpload {
    /// HTTP-style status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub code: Option<String>,
    /// Error message from the endpoint.
    pub message: Option<String>,
}

impl fmt::Display for RejectedUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for RejectedUpload {}

impl RejectedUpload {
    /// Create a new rejection.
    pub fn new(status: u16, code: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Returns true for statuses worth retrying.
    pub fn is_transient(&self) -> bool {
        self.status == 408 || self.status == 429 || self.status >= 500
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid record id.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid endpoint URL.
    #[error("invalid endpoint URL '{value}': {reason}")]
    EndpointUrl { value: String, reason: String },

    /// Payload is missing a field its kind requires.
    #[error("invalid {kind} payload: {reason}")]
    Payload { kind: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
