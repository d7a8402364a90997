use anyhow::Result;

use feedcast_core::storage::{Database, SourceRepository};

use super::parse_id;

pub async fn run(db: &Database, id: &str, priority: i64) -> Result<()> {
    let id = parse_id(id)?;
    let source_repo = SourceRepository::new(db);

    source_repo.set_priority(id, priority).await?;
    println!("Priority for {} set to {}.", id, priority);

    Ok(())
}
