//! Flush command implementation.

use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use clap::Args;

use fieldsync_core::{RetryPolicy, SyncConfig};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct FlushArgs {
    /// Maximum simultaneous uploads
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Attempts per record for transient failures
    #[arg(long, default_value_t = 1)]
    pub attempts: u32,

    /// Output the flush report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: FlushArgs, ctx: &Context) -> Result<()> {
    if ctx.endpoint_url()?.is_none() {
        bail!("No endpoint configured. Pass --endpoint or set FIELDSYNC_ENDPOINT.");
    }

    let retry = if args.attempts > 1 {
        RetryPolicy::exponential(
            args.attempts,
            Duration::from_millis(500),
            Duration::from_secs(10),
        )
    } else {
        RetryPolicy::none()
    };
    let config = SyncConfig::default()
        .with_max_concurrent_uploads(args.concurrency)
        .with_retry(retry);

    let queue = ctx.queue(config)?;

    if !queue.connectivity().refresh().await.is_online() {
        let pending = queue.get_pending_records().await?.len();
        output::warning(&format!(
            "{} is unreachable; {} record(s) stay pending",
            queue.endpoint().describe(),
            pending
        ));
        return Ok(());
    }

    let report = queue.flush().await.context("Failed to flush")?;

    if args.json {
        output::json(&report)?;
    } else {
        output::flush_report(&report);
    }

    if report.is_clean() {
        output::success(&format!("Synced {} record(s)", report.synced.len()));
        Ok(())
    } else {
        bail!("{} record(s) failed to sync", report.failed.len())
    }
}
