use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Database;
use crate::feed::{NewSource, Source};
use crate::{Error, Result};

/// Repository for source CRUD operations
pub struct SourceRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct SourceRow {
    id: String,
    name: String,
    feed_url: String,
    priority: i64,
    created_at: DateTime<Utc>,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        Source {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            feed_url: row.feed_url,
            priority: row.priority,
            created_at: row.created_at,
            pending_count: 0,
        }
    }
}

impl<'a> SourceRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new source
    pub async fn create(&self, new_source: &NewSource) -> Result<Source> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sources (id, name, feed_url, priority, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&new_source.name)
        .bind(&new_source.feed_url)
        .bind(new_source.priority)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| Error::SourceNotFound(id.to_string()))
    }

    /// Find a source by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Source>> {
        let row: Option<SourceRow> = sqlx::query_as(
            r#"
            SELECT id, name, feed_url, priority, created_at
            FROM sources
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Source::from))
    }

    /// Find a source by feed URL
    pub async fn find_by_feed_url(&self, feed_url: &str) -> Result<Option<Source>> {
        let row: Option<SourceRow> = sqlx::query_as(
            r#"
            SELECT id, name, feed_url, priority, created_at
            FROM sources
            WHERE feed_url = ?
            "#,
        )
        .bind(feed_url)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Source::from))
    }

    /// Get all sources with pending article counts
    pub async fn list_all(&self) -> Result<Vec<Source>> {
        let rows: Vec<SourceRow> = sqlx::query_as(
            r#"
            SELECT id, name, feed_url, priority, created_at
            FROM sources
            ORDER BY priority DESC, name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let mut sources: Vec<Source> = rows.into_iter().map(Source::from).collect();

        for source in &mut sources {
            let count: (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM articles WHERE source_id = ? AND posted_at IS NULL",
            )
            .bind(source.id.to_string())
            .fetch_one(self.db.pool())
            .await?;

            source.pending_count = count.0 as u32;
        }

        Ok(sources)
    }

    /// Change a source's publication priority
    pub async fn set_priority(&self, id: Uuid, priority: i64) -> Result<()> {
        let result = sqlx::query("UPDATE sources SET priority = ? WHERE id = ?")
            .bind(priority)
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::SourceNotFound(id.to_string()));
        }

        Ok(())
    }

    /// Delete a source and, via cascade, all of its articles
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sources WHERE id = ?")
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
