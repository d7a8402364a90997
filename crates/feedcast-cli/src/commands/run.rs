use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{http::StatusCode, routing::get, Router};
use tokio::sync::watch;
use tracing::{info, warn};

use feedcast_core::{
    ai::Summarizer,
    publish::{Publisher, TelegramPublisher},
    scheduler::SchedulerService,
    storage::Database,
    AppConfig,
};

pub async fn run(db: Arc<Database>, config: Arc<AppConfig>) -> Result<()> {
    let summarizer = Arc::new(Summarizer::new(&config)?);

    let bot_token = config
        .telegram
        .bot_token
        .as_deref()
        .ok_or_else(|| anyhow!("telegram.bot_token is not configured"))?;
    if config.telegram.channel_id.is_empty() {
        return Err(anyhow!("telegram.channel_id is not configured"));
    }
    let publisher: Arc<dyn Publisher> = Arc::new(TelegramPublisher::new(
        bot_token,
        &config.telegram.channel_id,
    ));

    // One process-wide shutdown signal for every long-running task
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    // Health endpoint
    let app = Router::new().route("/healthz", get(|| async { StatusCode::OK }));
    let listener = tokio::net::TcpListener::bind(&config.general.health_addr).await?;
    info!(
        "Health endpoint listening on {}",
        config.general.health_addr
    );

    let mut health_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = health_shutdown.changed().await;
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            warn!("Health endpoint stopped with error: {}", e);
        }
    });

    SchedulerService::new(db, config, summarizer, publisher)
        .run(shutdown_rx)
        .await;

    Ok(())
}
