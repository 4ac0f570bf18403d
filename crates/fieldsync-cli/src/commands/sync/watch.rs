//! Watch command implementation.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use tracing::info;

use fieldsync_core::SyncConfig;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between reachability checks
    #[arg(long, default_value_t = 15)]
    pub probe_interval: u64,

    /// Seconds between re-flushes while reachable
    #[arg(long, default_value_t = 60)]
    pub retry_interval: u64,

    /// Maximum simultaneous uploads
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

pub async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    if ctx.endpoint_url()?.is_none() {
        bail!("No endpoint configured. Pass --endpoint or set FIELDSYNC_ENDPOINT.");
    }

    let retry_interval =
        (args.retry_interval > 0).then(|| Duration::from_secs(args.retry_interval));
    let config = SyncConfig::default()
        .with_max_concurrent_uploads(args.concurrency)
        .with_retry_interval(retry_interval);

    let queue = ctx.queue(config)?;

    eprintln!("{} {}", "Watching".dimmed(), queue.endpoint().describe());
    eprintln!("{}", "Press Ctrl+C to stop.".dimmed());
    eprintln!();

    queue.connectivity().refresh().await;
    let poller = queue
        .connectivity()
        .spawn_polling(Duration::from_secs(args.probe_interval.max(1)));
    let watcher = queue.watch_connectivity();

    tokio::signal::ctrl_c().await?;
    info!("Stopping");

    watcher.abort();
    if let Some(poller) = poller {
        poller.abort();
    }
    queue.wait_idle().await;

    if let Some(report) = queue.last_report() {
        output::flush_report(&report);
    }
    let pending = queue.get_pending_records().await?.len();
    output::success(&format!("Stopped with {} record(s) pending", pending));

    Ok(())
}
