use anyhow::Result;

use feedcast_core::storage::{Database, SourceRepository};

pub async fn run(db: &Database) -> Result<()> {
    let source_repo = SourceRepository::new(db);
    let sources = source_repo.list_all().await?;

    if sources.is_empty() {
        println!("No sources yet.");
        println!("\nTo register a feed, run:");
        println!("  feedcast add-source --name <name> --url <url> --priority <n>");
        return Ok(());
    }

    println!("Sources ({}):\n", sources.len());

    for source in &sources {
        let pending = if source.pending_count > 0 {
            format!(" ({} pending)", source.pending_count)
        } else {
            String::new()
        };

        println!(
            "  [{}] {}{}",
            source.priority, source.name, pending
        );
        println!("    id:  {}", source.id);
        println!("    URL: {}", source.feed_url);
        println!();
    }

    Ok(())
}
