use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_mapper_data_management::{DataManager, events::TracingEvents, options::OptionsArgs};

/// CLI for manual data operations
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    options: OptionsArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace the database contents with the GPX files in the data directory
    Import,
    /// Print the number of stored tracks
    Count,
    /// Print the stored tracks, optionally limited to a time window
    List {
        /// Only tracks strictly after this RFC 3339 instant
        #[arg(long)]
        not_before: Option<DateTime<Utc>>,
        /// Only tracks strictly before this RFC 3339 instant
        #[arg(long)]
        not_after: Option<DateTime<Utc>>,
    },
    /// Print the timestamp of the most recent track
    Latest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let content_root = std::env::current_dir().context("Failed to determine working directory")?;
    let options = cli.options.resolve(&content_root).context("Failed to prepare data directory")?;
    let data_manager = DataManager::start(options, Arc::new(TracingEvents)).await?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Command::Import => {
            let imported = data_manager.import_tracks(&cancel).await?;
            println!("Imported {} track(s)", imported.count);
        }
        Command::Count => {
            let count = data_manager.get_track_count(&cancel).await?;
            println!("{}", count.count);
        }
        Command::List { not_before, not_after } => {
            for track in data_manager.get_tracks(not_before, not_after, &cancel).await? {
                println!("{}\t{}\t{} point(s)", track.timestamp.to_rfc3339(), track.name, track.points.len());
            }
        }
        Command::Latest => match data_manager.get_latest_track(&cancel).await? {
            Some(timestamp) => println!("{}", timestamp.to_rfc3339()),
            None => println!("No tracks stored"),
        },
    }

    Ok(())
}
