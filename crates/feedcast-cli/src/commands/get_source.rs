use anyhow::Result;

use feedcast_core::storage::{Database, SourceRepository};

use super::parse_id;

pub async fn run(db: &Database, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let source_repo = SourceRepository::new(db);

    match source_repo.find_by_id(id).await? {
        Some(source) => {
            println!("{}", source.name);
            println!("  id:       {}", source.id);
            println!("  URL:      {}", source.feed_url);
            println!("  priority: {}", source.priority);
            println!(
                "  added:    {}",
                source.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        None => {
            println!("Source {} not found.", id);
        }
    }

    Ok(())
}
