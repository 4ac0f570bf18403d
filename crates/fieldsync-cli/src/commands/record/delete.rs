//! Delete record command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use fieldsync_core::RecordStore;

use crate::context::{self, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,

    /// Delete even if the record has not been uploaded
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let id = context::parse_id(&args.id)?;

    let record = store
        .get(&id)
        .await
        .context("Failed to read record")?
        .with_context(|| format!("Record {} not found", id))?;

    if record.sync_pending && !args.force {
        anyhow::bail!("Record {} has not been synced; use --force to delete it", id);
    }

    store.delete(&id).await.context("Failed to delete record")?;

    output::success(&format!("Deleted record {}", id));
    Ok(())
}
