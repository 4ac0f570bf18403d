//! Show record command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use fieldsync_core::RecordStore;

use crate::context::{self, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: String,
}

pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let id = context::parse_id(&args.id)?;

    let record = store
        .get(&id)
        .await
        .context("Failed to read record")?
        .with_context(|| format!("Record {} not found", id))?;

    output::json_pretty(&record)
}
