//! Journal command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use futures_util::StreamExt;

use fieldsync_file::{FileJournal, JournalEvent, JournalOp};

use crate::context::Context;

#[derive(Args, Debug)]
pub struct JournalArgs {
    /// Keep running and print new events as they happen
    #[arg(long, short)]
    pub follow: bool,

    /// Output events as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: JournalArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;

    if !args.follow {
        for event in store.read_journal().context("Failed to read journal")? {
            print_event(&event, args.json);
        }
        return Ok(());
    }

    eprintln!("{}", "Following journal...".dimmed());
    eprintln!("{}", "Press Ctrl+C to stop.".dimmed());
    eprintln!();

    let mut stream = FileJournal::replay(&store).context("Failed to open journal")?;

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(event)) => print_event(&event, args.json),
                Some(Err(e)) => eprintln!("{} {}", "ERROR".red(), e),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn print_event(event: &JournalEvent, json_output: bool) {
    if json_output {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{}", json);
        }
        return;
    }

    let op = match event.op {
        JournalOp::Save => "SAVE".cyan(),
        JournalOp::Synced => "SYNCED".green(),
        JournalOp::Pending => "PENDING".yellow(),
        JournalOp::Edit => "EDIT".blue(),
        JournalOp::Delete => "DELETE".red(),
    };

    println!(
        "{} {:<8} {}",
        event.time.to_rfc3339().dimmed(),
        op,
        event.id
    );
}
