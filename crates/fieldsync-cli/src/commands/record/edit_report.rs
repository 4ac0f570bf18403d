//! Edit report command implementation.

use anyhow::{Context as _, Result, bail};
use clap::Args;

use fieldsync_core::{RecordPayload, RecordStore, RecordUpdate, ReportStatus};

use crate::context::{self, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct EditReportArgs {
    /// Report id
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,

    /// New status: draft, processing or complete
    #[arg(long)]
    pub status: Option<String>,
}

pub async fn run(args: EditReportArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let id = context::parse_id(&args.id)?;

    let record = store
        .get(&id)
        .await?
        .with_context(|| format!("Report {} not found", id))?;

    let RecordPayload::Report(mut report) = record.payload else {
        bail!("{} is an entry, not a report", id);
    };

    if let Some(title) = args.title {
        report.title = title;
    }
    if args.notes.is_some() {
        report.notes = args.notes;
    }
    if let Some(status) = args.status {
        report.status = status
            .parse::<ReportStatus>()
            .context("Invalid report status")?;
    }

    let payload = RecordPayload::Report(report);
    payload.validate().context("Invalid report")?;

    // Also re-flags the report, in the same write.
    store
        .update(&id, RecordUpdate::ReplacePayload(payload))
        .await
        .context("Failed to update report")?;

    output::success(&format!("Updated report {} (pending sync)", id));

    Ok(())
}
