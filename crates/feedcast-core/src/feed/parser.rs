use chrono::{DateTime, Utc};
use feed_rs::parser;
use uuid::Uuid;

use super::models::NewArticle;
use crate::{Error, Result};

/// Parse RSS/Atom feed content into article candidates for one source.
/// Entries without a link are dropped: the link is the dedup key.
pub fn parse_feed(content: &[u8], source_id: Uuid) -> Result<Vec<NewArticle>> {
    let feed = parser::parse(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    let articles = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone())?;

            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content));

            let content_text = content.as_deref().map(html_to_text);

            let published_at = entry
                .published
                .or(entry.updated)
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);

            Some(NewArticle {
                source_id,
                title,
                link,
                content_text,
                published_at,
            })
        })
        .collect();

    Ok(articles)
}

/// Convert HTML content to plain text
fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 80).unwrap_or_else(|_| html.to_string())
}
