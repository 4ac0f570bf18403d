//! Sync subcommand implementations.

mod flush;
mod status;
mod watch;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct SyncCommand {
    #[command(subcommand)]
    pub command: SyncSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SyncSubcommand {
    /// Upload pending records once
    Flush(flush::FlushArgs),

    /// Keep uploading whenever the endpoint is reachable
    Watch(watch::WatchArgs),

    /// Show pending counts and reachability
    Status(status::StatusArgs),
}

pub async fn handle(cmd: SyncCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        SyncSubcommand::Flush(args) => flush::run(args, ctx).await,
        SyncSubcommand::Watch(args) => watch::run(args, ctx).await,
        SyncSubcommand::Status(args) => status::run(args, ctx).await,
    }
}
