//! Domain payloads carried by records.
//!
//! The sync queue never looks inside these; they are here so stores and
//! endpoints share one serialized shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};
use crate::types::RecordId;

/// The domain data of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordPayload {
    /// An inspection report grouping entries.
    Report(Report),
    /// A piece of captured evidence attached to a report.
    Entry(Entry),
}

impl RecordPayload {
    /// Short label for logs and CLI output.
    pub fn kind_label(&self) -> &'static str {
        match self {
            RecordPayload::Report(_) => "report",
            RecordPayload::Entry(entry) => entry.kind.as_str(),
        }
    }

    /// Returns the owning report for entries.
    pub fn parent_id(&self) -> Option<&RecordId> {
        match self {
            RecordPayload::Report(_) => None,
            RecordPayload::Entry(entry) => Some(&entry.report_id),
        }
    }

    /// Check that the payload carries what its kind needs.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            RecordPayload::Report(report) => report.validate(),
            RecordPayload::Entry(entry) => entry.validate(),
        }
    }
}

/// Lifecycle status of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Draft,
    Processing,
    Complete,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Processing => "processing",
            ReportStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(ReportStatus::Draft),
            "processing" => Ok(ReportStatus::Processing),
            "complete" | "completed" => Ok(ReportStatus::Complete),
            other => Err(InvalidInputError::Other {
                message: format!("unknown report status '{}'", other),
            }
            .into()),
        }
    }
}

/// An inspection or site-visit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
}

impl Report {
    /// A draft report with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            project_id: None,
            title: title.into(),
            notes: None,
            status: ReportStatus::Draft,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(InvalidInputError::Payload {
                kind: "report".to_string(),
                reason: "title cannot be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// The kind of evidence an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Photo,
    Video,
    Audio,
    Note,
    Scan,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Photo => "photo",
            EntryKind::Video => "video",
            EntryKind::Audio => "audio",
            EntryKind::Note => "note",
            EntryKind::Scan => "scan",
        }
    }

    /// Photo, video and audio entries point at a captured media file.
    pub fn requires_media(&self) -> bool {
        matches!(self, EntryKind::Photo | EntryKind::Video | EntryKind::Audio)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "photo" => Ok(EntryKind::Photo),
            "video" => Ok(EntryKind::Video),
            "audio" | "voice" => Ok(EntryKind::Audio),
            "note" | "text" => Ok(EntryKind::Note),
            "scan" | "barcode" | "qr" => Ok(EntryKind::Scan),
            other => Err(InvalidInputError::Other {
                message: format!("unknown entry kind '{}'", other),
            }
            .into()),
        }
    }
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A captured piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub report_id: RecordId,
    pub kind: EntryKind,
    /// Local path of the captured media file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_path: Option<String>,
    /// Note text, transcription, or decoded scan value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl Entry {
    /// A bare entry of the given kind; fill in the fields the kind needs.
    pub fn new(report_id: RecordId, kind: EntryKind) -> Self {
        Self {
            report_id,
            kind,
            media_path: None,
            content: None,
            duration_secs: None,
            location: None,
        }
    }

    pub fn with_media(mut self, path: impl Into<String>) -> Self {
        self.media_path = Some(path.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    fn validate(&self) -> Result<(), Error> {
        let missing = |reason: &str| -> Error {
            InvalidInputError::Payload {
                kind: self.kind.as_str().to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if self.kind.requires_media() && self.media_path.as_deref().is_none_or(str::is_empty) {
            return Err(missing("media path is required"));
        }

        match self.kind {
            EntryKind::Note if self.content.as_deref().is_none_or(|c| c.trim().is_empty()) => {
                Err(missing("note text is required"))
            }
            EntryKind::Scan if self.content.as_deref().is_none_or(str::is_empty) => {
                Err(missing("scanned value is required"))
            }
            _ => Ok(()),
        }
    }
}
