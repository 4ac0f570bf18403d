//! Record subcommand implementations.

mod create_entry;
mod create_report;
mod delete;
mod edit_report;
mod journal;
mod list;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct RecordCommand {
    #[command(subcommand)]
    pub command: RecordSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordSubcommand {
    /// Start a new inspection report
    CreateReport(create_report::CreateReportArgs),

    /// Attach captured evidence to a report
    CreateEntry(create_entry::CreateEntryArgs),

    /// Change a report's title, notes or status
    EditReport(edit_report::EditReportArgs),

    /// List local records
    List(list::ListArgs),

    /// Print a single record
    Show(show::ShowArgs),

    /// Delete a local record
    Delete(delete::DeleteArgs),

    /// Print the store journal
    Journal(journal::JournalArgs),
}

pub async fn handle(cmd: RecordCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        RecordSubcommand::CreateReport(args) => create_report::run(args, ctx).await,
        RecordSubcommand::CreateEntry(args) => create_entry::run(args, ctx).await,
        RecordSubcommand::EditReport(args) => edit_report::run(args, ctx).await,
        RecordSubcommand::List(args) => list::run(args, ctx).await,
        RecordSubcommand::Show(args) => show::run(args, ctx).await,
        RecordSubcommand::Delete(args) => delete::run(args, ctx).await,
        RecordSubcommand::Journal(args) => journal::run(args, ctx).await,
    }
}
