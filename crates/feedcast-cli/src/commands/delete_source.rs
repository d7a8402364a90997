use anyhow::Result;

use feedcast_core::storage::{Database, SourceRepository};

use super::parse_id;

pub async fn run(db: &Database, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let source_repo = SourceRepository::new(db);

    if source_repo.delete(id).await? {
        println!("Deleted source {} and its articles.", id);
    } else {
        println!("Source {} not found.", id);
    }

    Ok(())
}
