//! List records command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use fieldsync_core::RecordStore;

use crate::context::{self, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only records waiting for upload
    #[arg(long)]
    pub pending: bool,

    /// Only entries of this report
    #[arg(long)]
    pub report: Option<String>,

    /// Output records as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;

    let mut records = if args.pending {
        store.query_pending().await
    } else {
        store.list().await
    }
    .context("Failed to read records")?;

    if let Some(report) = &args.report {
        let report_id = context::parse_id(report)?;
        records.retain(|r| r.parent_id() == Some(&report_id));
    }

    if records.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
        return Ok(());
    }

    for record in &records {
        if args.json {
            output::json(record)?;
        } else {
            output::record_line(record);
        }
    }

    Ok(())
}
