//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::record::RecordCommand;
use crate::commands::sync::SyncCommand;

/// Capture field records offline and sync them when the backend is reachable.
#[derive(Parser, Debug)]
#[command(name = "fieldsync")]
#[command(author, version = env!("FIELDSYNC_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Local data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "FIELDSYNC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Sync endpoint: https:// backend or file:// outbox directory
    #[arg(long, global = true, env = "FIELDSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token for the HTTP backend
    #[arg(long, global = true, env = "FIELDSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and inspect local records
    Record(RecordCommand),

    /// Upload pending records
    Sync(SyncCommand),
}
