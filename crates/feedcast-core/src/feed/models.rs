use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered feed endpoint with an operator-assigned priority.
/// Higher priority wins when the notification loop selects an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: Uuid,
    pub name: String,
    pub feed_url: String,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    /// Computed field (not stored in DB)
    #[serde(default)]
    pub pending_count: u32,
}

/// Data required to register a new source
#[derive(Debug, Clone)]
pub struct NewSource {
    pub name: String,
    pub feed_url: String,
    pub priority: i64,
}

/// One discovered feed item, uniquely keyed by (source_id, link).
/// Progresses from pending (`posted_at` null) to delivered exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub source_id: Uuid,
    pub title: String,
    pub link: String,
    pub content_text: Option<String>,
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// Data required to store a newly discovered article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub source_id: Uuid,
    pub title: String,
    pub link: String,
    pub content_text: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Check if the article has been delivered to the channel
    pub fn is_posted(&self) -> bool {
        self.posted_at.is_some()
    }

    /// Text handed to the summarizer; falls back to the title when the
    /// feed item carried no body
    pub fn summary_input(&self) -> &str {
        self.content_text.as_deref().unwrap_or(&self.title)
    }
}
