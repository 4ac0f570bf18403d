//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use fieldsync_core::{FlushReport, Record, RecordPayload};

/// Print a success message.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One-line summary of a record.
pub fn record_line(record: &Record) {
    let status = if record.sync_pending {
        "PENDING".yellow()
    } else {
        "SYNCED".green()
    };

    let summary = match &record.payload {
        RecordPayload::Report(report) => format!("{} [{}]", report.title, report.status),
        RecordPayload::Entry(entry) => {
            let detail = entry
                .content
                .as_deref()
                .or(entry.media_path.as_deref())
                .unwrap_or("");
            format!("{} -> {}", detail, entry.report_id.as_str().dimmed())
        }
    };

    println!(
        "{} {} {:<6} {}",
        status,
        record.id,
        record.payload.kind_label().cyan(),
        summary
    );
}

/// Human-readable flush summary.
pub fn flush_report(report: &FlushReport) {
    field("Attempted", &report.attempted.to_string());
    field("Synced", &report.synced.len().to_string());
    field("Failed", &report.failed.len().to_string());
    field("Skipped", &report.skipped.len().to_string());
    for id in &report.failed {
        println!("  {} {}", "FAILED".red(), id);
    }
}
