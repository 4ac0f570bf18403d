//! Create entry command implementation.

use anyhow::{Context as _, Result, bail};
use clap::Args;

use fieldsync_core::{Entry, EntryKind, GeoPoint, RecordPayload, RecordStore, SyncConfig};

use crate::context::{self, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct CreateEntryArgs {
    /// Owning report id
    #[arg(long)]
    pub report: String,

    /// Entry kind: photo, video, audio, note or scan
    #[arg(long, short = 'k')]
    pub kind: String,

    /// Path of the captured media file
    #[arg(long)]
    pub media: Option<String>,

    /// Note text, transcription or scanned value
    #[arg(long)]
    pub content: Option<String>,

    /// Recording length in seconds
    #[arg(long)]
    pub duration: Option<u32>,

    /// Latitude of the capture location
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the capture location
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

pub async fn run(args: CreateEntryArgs, ctx: &Context) -> Result<()> {
    let queue = ctx.queue(SyncConfig::default())?;

    let report_id = context::parse_id(&args.report)?;
    let kind: EntryKind = args.kind.parse().context("Invalid entry kind")?;

    match queue.store().get(&report_id).await? {
        Some(parent) if parent.parent_id().is_none() => {}
        Some(_) => bail!("{} is an entry, not a report", report_id),
        None => bail!("Report {} not found", report_id),
    }

    let mut entry = Entry::new(report_id, kind);
    entry.media_path = args.media;
    entry.content = args.content;
    entry.duration_secs = args.duration;
    entry.location = match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let record = queue
        .create_record(RecordPayload::Entry(entry))
        .await
        .context("Failed to create entry")?;

    println!("{}", record.id);
    output::success(&format!("Created {} entry {}", kind, record.id));

    Ok(())
}
