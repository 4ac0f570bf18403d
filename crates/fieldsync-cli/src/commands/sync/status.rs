//! Status command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use fieldsync_core::{RecordStore, SyncConfig};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output status as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    data_dir: String,
    endpoint: String,
    online: bool,
    total: usize,
    pending: usize,
}

pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let queue = ctx.queue(SyncConfig::default())?;

    let total = queue.store().list().await?.len();
    let pending = queue.get_pending_records().await?.len();
    let online = queue.connectivity().refresh().await.is_online();

    let status = Status {
        data_dir: queue.store().root().display().to_string(),
        endpoint: queue.endpoint().describe(),
        online,
        total,
        pending,
    };

    if args.json {
        return output::json(&status);
    }

    output::field("Data dir", &status.data_dir);
    output::field("Endpoint", &status.endpoint);
    let reachability = if online {
        "online".green()
    } else {
        "offline".red()
    };
    println!("{}: {}", "Reachability".dimmed(), reachability);
    output::field("Records", &status.total.to_string());
    output::field("Pending", &status.pending.to_string());

    Ok(())
}
