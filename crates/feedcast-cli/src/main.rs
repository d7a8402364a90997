use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedcast_core::{storage::Database, AppConfig};

mod commands;

#[derive(Parser)]
#[command(name = "feedcast")]
#[command(version, about = "Feed ingest and channel republishing daemon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon: fetch loop, notification loop, health endpoint
    Run,
    /// Register a feed source
    AddSource {
        /// Display name for the source
        #[arg(short, long)]
        name: String,
        /// Feed URL
        #[arg(short, long)]
        url: String,
        /// Publication priority (higher wins)
        #[arg(short, long, default_value_t = 0)]
        priority: i64,
    },
    /// List registered sources
    ListSources,
    /// Show one source
    GetSource {
        /// Source id
        id: String,
    },
    /// Change a source's publication priority
    SetPriority {
        /// Source id
        id: String,
        /// New priority
        priority: i64,
    },
    /// Delete a source and all of its articles
    DeleteSource {
        /// Source id
        id: String,
    },
    /// Run one fetch sweep and exit
    Fetch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize database
    let db = Arc::new(Database::new(&config).await?);

    match cli.command {
        Commands::Run => commands::run::run(db, config).await,
        Commands::AddSource {
            name,
            url,
            priority,
        } => commands::add_source::run(&db, &name, &url, priority).await,
        Commands::ListSources => commands::list::run(&db).await,
        Commands::GetSource { id } => commands::get_source::run(&db, &id).await,
        Commands::SetPriority { id, priority } => {
            commands::set_priority::run(&db, &id, priority).await
        }
        Commands::DeleteSource { id } => commands::delete_source::run(&db, &id).await,
        Commands::Fetch => commands::fetch::run(&db, &config).await,
    }
}
