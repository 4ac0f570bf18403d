//! Create report command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use fieldsync_core::{RecordPayload, Report, SyncConfig};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateReportArgs {
    /// Report title
    pub title: String,

    /// Project the report belongs to
    #[arg(long)]
    pub project: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn run(args: CreateReportArgs, ctx: &Context) -> Result<()> {
    let queue = ctx.queue(SyncConfig::default())?;

    let mut report = Report::new(args.title);
    report.project_id = args.project;
    report.notes = args.notes;

    let record = queue
        .create_record(RecordPayload::Report(report))
        .await
        .context("Failed to create report")?;

    println!("{}", record.id);
    output::success(&format!("Created report {} (pending sync)", record.id));

    Ok(())
}
