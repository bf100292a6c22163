use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use server::{router, server_state::ServerState};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_mapper_data_management::{DataManager, events::TracingEvents, options::OptionsArgs};

const LOG_DIRECTORY: &str = "server/log";
const LOG_FILE: &str = "server/log/server.log";

#[derive(Debug, Parser)]
#[command(version, about = "Serves imported workout tracks to the map front end")]
struct Args {
    #[command(flatten)]
    options: OptionsArgs,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:5000")]
    bind_address: SocketAddr,

    /// Directory with the front end assets
    #[arg(long, env = "STATIC_DIRECTORY", default_value = "wwwroot")]
    static_directory: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::fs::create_dir_all(LOG_DIRECTORY).context("Failed to create log directory")?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
        .context("Failed to open log file")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=trace,workout_mapper_data_management=debug", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    tracing::info!("Starting server...");

    let args = Args::parse();
    let content_root = std::env::current_dir().context("Failed to determine working directory")?;
    let options = args.options.resolve(&content_root).context("Failed to prepare data directory")?;
    let static_directory = content_root.join(&args.static_directory);

    tracing::debug!("Data directory is {}", options.data_directory.display());

    let data_manager = DataManager::start(options, Arc::new(TracingEvents)).await?;
    let shutdown = CancellationToken::new();

    let server_state = Arc::new(ServerState {
        data_manager,
        shutdown: shutdown.clone(),
    });

    let app = router(server_state, &static_directory);

    let listener = tokio::net::TcpListener::bind(args.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind_address))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
    shutdown.cancel();
}
