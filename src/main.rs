use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forum_thread_store::config::ForumConfig;
use forum_thread_store::db::Database;
use forum_thread_store::forum::{find_for_forum, PageRequest};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

/// Open the store, bring the schema up to date, and log the first forum
/// page. Useful as a smoke check against a deployed database file.
async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = ForumConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    if let Some(parent) = config.database_path.parent() {
        tokio::fs::create_dir_all(parent).await.with_context(|| {
            format!(
                "Failed to create database directory: {}",
                parent.display()
            )
        })?;
    }

    let db = Database::open(&config.database_path)
        .await
        .context("Failed to open database")?;

    let page = find_for_forum(db.pool(), PageRequest::new(1, config.per_page))
        .await
        .context("Failed to query forum page")?;

    info!(
        total = page.total,
        shown = page.items.len(),
        "Threads by latest activity"
    );

    for row in &page.items {
        info!(
            id = row.thread.id,
            latest_activity = %row.latest_activity,
            subject = %row.thread.subject,
            "thread"
        );
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forum_thread_store=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}
