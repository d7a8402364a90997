use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::ai::Summarizer;
use crate::config::AppConfig;
use crate::publish::Publisher;
use crate::storage::Database;

use super::tasks::{fetch_all_sources, publish_next};

/// Long-running scheduler that drives the fetch and notification
/// loops. The loops share no state; every interaction goes through
/// the store, so a failed tick leaves nothing to clean up.
pub struct SchedulerService {
    db: Arc<Database>,
    config: Arc<AppConfig>,
    summarizer: Arc<Summarizer>,
    publisher: Arc<dyn Publisher>,
}

impl SchedulerService {
    pub fn new(
        db: Arc<Database>,
        config: Arc<AppConfig>,
        summarizer: Arc<Summarizer>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            db,
            config,
            summarizer,
            publisher,
        }
    }

    /// Run both loops until the shutdown signal fires. Tick failures
    /// are logged and the schedule continues; only shutdown ends the
    /// loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let fetch_secs = self.config.fetch.interval_secs;
        let notify_secs = self.config.notify.interval_secs;

        info!(
            "Scheduler started: fetch={}s, notify={}s, lookback={}s",
            fetch_secs, notify_secs, self.config.notify.lookback_window_secs
        );

        let mut fetch_interval = tokio::time::interval(Duration::from_secs(fetch_secs));
        let mut notify_interval = tokio::time::interval(Duration::from_secs(notify_secs));

        // A slow tick delays the next one instead of bursting to
        // catch up; ticks never overlap.
        fetch_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        notify_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Both intervals fire immediately, so a fresh process sweeps
        // its sources and checks the backlog without waiting a full
        // period.
        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_ok() && *shutdown.borrow() {
                        info!("Scheduler received shutdown signal");
                        break;
                    }
                }

                _ = fetch_interval.tick() => {
                    debug!("Running fetch sweep");
                    match fetch_all_sources(&self.db, &self.config).await {
                        Ok(new_articles) => {
                            if new_articles > 0 {
                                info!("Fetch sweep: {} new articles", new_articles);
                            }
                        }
                        Err(e) => {
                            error!("Fetch sweep failed: {}", e);
                        }
                    }
                }

                _ = notify_interval.tick() => {
                    debug!("Running notification tick");
                    match publish_next(
                        &self.db,
                        &self.summarizer,
                        self.publisher.as_ref(),
                        &self.config,
                    ).await {
                        Ok(true) => {}
                        Ok(false) => debug!("No eligible article this tick"),
                        Err(e) => {
                            error!("Notification tick failed: {}", e);
                        }
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    use crate::ai::providers::AiProvider;
    use crate::{Error, Result};

    struct NoProvider;

    #[async_trait::async_trait]
    impl AiProvider for NoProvider {
        async fn summarize(&self, _content: &str) -> Result<String> {
            Err(Error::Summarizer("unused".to_string()))
        }
    }

    struct NoPublisher;

    #[async_trait::async_trait]
    impl Publisher for NoPublisher {
        async fn publish(&self, _text: &str) -> Result<()> {
            Err(Error::Publish("unused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_scheduler_exits_on_shutdown() {
        let db = Arc::new(Database::new_in_memory().await.unwrap());
        let config = Arc::new(AppConfig::default());
        let summarizer = Arc::new(Summarizer::with_provider(
            Arc::new(NoProvider),
            Duration::from_secs(1),
        ));
        let publisher: Arc<dyn Publisher> = Arc::new(NoPublisher);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let service = SchedulerService::new(db, config, summarizer, publisher);
        let handle = tokio::spawn(service.run(shutdown_rx));

        // The immediate first ticks run against an empty database,
        // then the shutdown signal must end the loop promptly.
        shutdown_tx.send(true).unwrap();

        let result = timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok());
    }
}
