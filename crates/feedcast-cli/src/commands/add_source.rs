use anyhow::Result;

use feedcast_core::{
    feed::NewSource,
    storage::{Database, SourceRepository},
};

pub async fn run(db: &Database, name: &str, url: &str, priority: i64) -> Result<()> {
    let source_repo = SourceRepository::new(db);

    // Check if already registered
    if let Some(existing) = source_repo.find_by_feed_url(url).await? {
        println!(
            "Feed already registered as '{}' ({})",
            existing.name, existing.id
        );
        return Ok(());
    }

    let source = source_repo
        .create(&NewSource {
            name: name.to_string(),
            feed_url: url.to_string(),
            priority,
        })
        .await?;

    println!(
        "Registered source '{}' with priority {} ({})",
        source.name, source.priority, source.id
    );
    println!("Articles will appear after the next fetch sweep.");

    Ok(())
}
