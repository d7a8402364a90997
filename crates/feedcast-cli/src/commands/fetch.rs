use anyhow::Result;

use feedcast_core::{scheduler::fetch_all_sources, storage::Database, AppConfig};

pub async fn run(db: &Database, config: &AppConfig) -> Result<()> {
    println!("Running fetch sweep...\n");

    let new_articles = fetch_all_sources(db, config).await?;

    println!("\nSweep complete. {} new articles stored.", new_articles);

    Ok(())
}
