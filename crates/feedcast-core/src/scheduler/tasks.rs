use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::task::JoinSet;

use crate::ai::Summarizer;
use crate::config::AppConfig;
use crate::feed::{FeedFetcher, KeywordFilter};
use crate::publish::{format_message, Publisher};
use crate::storage::{ArticleRepository, Database, SourceRepository};
use crate::Result;

/// One fetch tick: sweep every registered source, filter the items,
/// and store whatever is new. Per-source failures are logged and
/// skipped; only storage errors end the sweep early. Returns the
/// number of newly inserted articles.
pub async fn fetch_all_sources(db: &Database, config: &AppConfig) -> Result<u32> {
    let fetcher = Arc::new(FeedFetcher::new(config)?);
    let filter = KeywordFilter::new(&config.fetch.filter_keywords);
    let sources = SourceRepository::new(db).list_all().await?;

    // Retrievals are independent and order-insensitive, so they run
    // concurrently; inserts stay on this task.
    let mut join_set = JoinSet::new();
    for source in sources {
        let fetcher = Arc::clone(&fetcher);
        join_set.spawn(async move {
            let items = fetcher.fetch(&source.feed_url, source.id).await;
            (source, items)
        });
    }

    let article_repo = ArticleRepository::new(db);
    let mut total_new = 0;

    while let Some(joined) = join_set.join_next().await {
        let (source, fetched) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Fetch task failed to complete: {}", e);
                continue;
            }
        };

        match fetched {
            Ok(items) => {
                let mut new_count = 0;
                for item in items.iter().filter(|item| filter.matches(item)) {
                    if article_repo.insert_if_new(item).await? {
                        new_count += 1;
                    }
                }

                if new_count > 0 {
                    tracing::info!("Source '{}': {} new articles", source.name, new_count);
                }
                total_new += new_count;
            }
            Err(e) => {
                // One bad feed never aborts the sweep for the others
                tracing::warn!("Failed to fetch source '{}': {}", source.name, e);
            }
        }
    }

    Ok(total_new)
}

/// One notification tick: select the best eligible pending article,
/// summarize it, publish it, and only then mark it posted.
///
/// The ordering is the delivery contract. A failure at any step leaves
/// the article pending so the next tick reconsiders it; a crash
/// between publish and mark risks at most a duplicate delivery, never
/// a silent loss. Returns whether an article was published.
pub async fn publish_next(
    db: &Database,
    summarizer: &Summarizer,
    publisher: &dyn Publisher,
    config: &AppConfig,
) -> Result<bool> {
    let lookback = Duration::seconds(config.notify.lookback_window_secs as i64);
    let not_after = Utc::now() - lookback;

    let article_repo = ArticleRepository::new(db);
    let Some(article) = article_repo.next_eligible(not_after).await? else {
        // Empty backlog is the normal steady state
        return Ok(false);
    };

    let summary = match &article.summary {
        Some(summary) => summary.clone(),
        None => match summarizer.summarize(article.summary_input()).await {
            Ok(summary) => {
                article_repo.update_summary(article.id, &summary).await?;
                summary
            }
            Err(e) => {
                tracing::warn!("Failed to summarize '{}': {}", article.title, e);
                return Ok(false);
            }
        },
    };

    let message = format_message(&article.title, &summary, &article.link);
    if let Err(e) = publisher.publish(&message).await {
        tracing::warn!("Failed to publish '{}': {}", article.title, e);
        return Ok(false);
    }

    article_repo.mark_posted(article.id, Utc::now()).await?;
    tracing::info!("Published '{}'", article.title);

    Ok(true)
}
