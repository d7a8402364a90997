use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Database;
use crate::feed::{Article, NewArticle};
use crate::Result;

/// Repository for article storage, selection, and delivery state
pub struct ArticleRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct ArticleRow {
    id: String,
    source_id: String,
    title: String,
    link: String,
    content_text: Option<String>,
    summary: Option<String>,
    published_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    posted_at: Option<DateTime<Utc>>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            source_id: Uuid::parse_str(&row.source_id).unwrap_or_default(),
            title: row.title,
            link: row.link,
            content_text: row.content_text,
            summary: row.summary,
            published_at: row.published_at,
            created_at: row.created_at,
            posted_at: row.posted_at,
        }
    }
}

impl<'a> ArticleRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Store a newly discovered article unless (source_id, link) is
    /// already present. Returns whether a row was inserted; a false
    /// result is the normal outcome of re-fetching an unchanged feed
    /// window, never an error.
    pub async fn insert_if_new(&self, new_article: &NewArticle) -> Result<bool> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO articles
            (id, source_id, title, link, content_text, published_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(new_article.source_id.to_string())
        .bind(&new_article.title)
        .bind(&new_article.link)
        .bind(&new_article.content_text)
        .bind(new_article.published_at)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find an article by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        let row: Option<ArticleRow> = sqlx::query_as(
            r#"
            SELECT id, source_id, title, link, content_text, summary,
                   published_at, created_at, posted_at
            FROM articles
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Article::from))
    }

    /// The single best publication candidate: pending, fresh enough,
    /// ordered by source priority descending then oldest-first within
    /// a priority tier so a backlog drains in publication order.
    /// Ties break on article id for determinism.
    pub async fn next_eligible(&self, not_after: DateTime<Utc>) -> Result<Option<Article>> {
        let row: Option<ArticleRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.source_id, a.title, a.link, a.content_text, a.summary,
                   a.published_at, a.created_at, a.posted_at
            FROM articles a
            JOIN sources s ON s.id = a.source_id
            WHERE a.posted_at IS NULL AND a.published_at >= ?
            ORDER BY s.priority DESC, a.published_at ASC, a.id ASC
            LIMIT 1
            "#,
        )
        .bind(not_after)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Article::from))
    }

    /// Record delivery. Called at most once per selected article, only
    /// after the publish call has succeeded.
    pub async fn mark_posted(&self, id: Uuid, posted_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE articles SET posted_at = ? WHERE id = ?")
            .bind(posted_at)
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Persist a generated summary so a failed publish does not force
    /// a re-summarize on the retry tick
    pub async fn update_summary(&self, id: Uuid, summary: &str) -> Result<()> {
        sqlx::query("UPDATE articles SET summary = ? WHERE id = ?")
            .bind(summary)
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Count articles awaiting publication
    pub async fn count_pending(&self) -> Result<u32> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM articles WHERE posted_at IS NULL")
                .fetch_one(self.db.pool())
                .await?;

        Ok(count.0 as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::feed::NewSource;
    use crate::storage::SourceRepository;

    async fn seed_source(db: &Database, name: &str, priority: i64) -> Uuid {
        SourceRepository::new(db)
            .create(&NewSource {
                name: name.to_string(),
                feed_url: format!("https://example.com/{}.xml", name),
                priority,
            })
            .await
            .unwrap()
            .id
    }

    fn item(source_id: Uuid, link: &str, published_at: DateTime<Utc>) -> NewArticle {
        NewArticle {
            source_id,
            title: format!("Story at {}", link),
            link: link.to_string(),
            content_text: Some("body".to_string()),
            published_at,
        }
    }

    #[tokio::test]
    async fn test_insert_is_idempotent_per_source_and_link() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let source = seed_source(&db, "wire", 0).await;

        let article = item(source, "https://example.com/a", Utc::now());
        assert!(repo.insert_if_new(&article).await.unwrap());
        assert!(!repo.insert_if_new(&article).await.unwrap());
        assert!(!repo.insert_if_new(&article).await.unwrap());

        assert_eq!(repo.count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_same_link_different_sources_are_distinct() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let a = seed_source(&db, "a", 0).await;
        let b = seed_source(&db, "b", 0).await;

        let link = "https://example.com/shared";
        assert!(repo.insert_if_new(&item(a, link, Utc::now())).await.unwrap());
        assert!(repo.insert_if_new(&item(b, link, Utc::now())).await.unwrap());

        assert_eq!(repo.count_pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_selection_prefers_priority_then_oldest() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let high = seed_source(&db, "high", 10).await;
        let low = seed_source(&db, "low", 5).await;

        let now = Utc::now();
        // Low-priority article is the oldest overall; high priority
        // must still win.
        repo.insert_if_new(&item(low, "https://example.com/l1", now - Duration::minutes(30)))
            .await
            .unwrap();
        repo.insert_if_new(&item(high, "https://example.com/h2", now - Duration::minutes(10)))
            .await
            .unwrap();
        repo.insert_if_new(&item(high, "https://example.com/h1", now - Duration::minutes(20)))
            .await
            .unwrap();

        let not_after = now - Duration::hours(1);

        let first = repo.next_eligible(not_after).await.unwrap().unwrap();
        assert_eq!(first.source_id, high);
        assert_eq!(first.link, "https://example.com/h1");

        repo.mark_posted(first.id, Utc::now()).await.unwrap();
        let second = repo.next_eligible(not_after).await.unwrap().unwrap();
        assert_eq!(second.link, "https://example.com/h2");

        repo.mark_posted(second.id, Utc::now()).await.unwrap();
        let third = repo.next_eligible(not_after).await.unwrap().unwrap();
        assert_eq!(third.link, "https://example.com/l1");
    }

    #[tokio::test]
    async fn test_ties_break_on_article_id() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let source = seed_source(&db, "wire", 0).await;

        let published = Utc::now() - Duration::minutes(5);
        repo.insert_if_new(&item(source, "https://example.com/x", published))
            .await
            .unwrap();
        repo.insert_if_new(&item(source, "https://example.com/y", published))
            .await
            .unwrap();

        let not_after = Utc::now() - Duration::hours(1);
        let first = repo.next_eligible(not_after).await.unwrap().unwrap();
        repo.mark_posted(first.id, Utc::now()).await.unwrap();
        let second = repo.next_eligible(not_after).await.unwrap().unwrap();

        // Same priority and published_at: selection order must follow
        // ascending article id.
        assert!(first.id.to_string() < second.id.to_string());
    }

    #[tokio::test]
    async fn test_stale_articles_are_never_selected() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let source = seed_source(&db, "wire", 0).await;

        let now = Utc::now();
        repo.insert_if_new(&item(source, "https://example.com/old", now - Duration::hours(3)))
            .await
            .unwrap();

        let not_after = now - Duration::hours(1);
        assert!(repo.next_eligible(not_after).await.unwrap().is_none());

        // Still counted as pending; it is just outside the window
        assert_eq!(repo.count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_posted_articles_leave_the_candidate_pool() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let source = seed_source(&db, "wire", 0).await;

        let now = Utc::now();
        repo.insert_if_new(&item(source, "https://example.com/a", now))
            .await
            .unwrap();

        let not_after = now - Duration::hours(1);
        let selected = repo.next_eligible(not_after).await.unwrap().unwrap();
        assert!(!selected.is_posted());

        repo.mark_posted(selected.id, Utc::now()).await.unwrap();

        assert!(repo.next_eligible(not_after).await.unwrap().is_none());
        let reloaded = repo.find_by_id(selected.id).await.unwrap().unwrap();
        assert!(reloaded.is_posted());
    }

    #[tokio::test]
    async fn test_update_summary_round_trip() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = ArticleRepository::new(&db);
        let source = seed_source(&db, "wire", 0).await;

        repo.insert_if_new(&item(source, "https://example.com/a", Utc::now()))
            .await
            .unwrap();
        let article = repo
            .next_eligible(Utc::now() - Duration::hours(1))
            .await
            .unwrap()
            .unwrap();
        assert!(article.summary.is_none());

        repo.update_summary(article.id, "short version").await.unwrap();

        let reloaded = repo.find_by_id(article.id).await.unwrap().unwrap();
        assert_eq!(reloaded.summary.as_deref(), Some("short version"));
    }
}
