//! Integration tests for schema migrations, including the articles
//! shared_at column.

use forum_thread_store::db::{get_article, insert_article, mark_article_shared, Database};
use tempfile::TempDir;

async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::open(&db_path)
        .await
        .expect("Failed to open database");
    (db, temp_dir)
}

#[tokio::test]
async fn test_fresh_database_is_at_current_schema_version() {
    let (db, _temp_dir) = setup_db().await;

    let (version,): (i32,) = sqlx::query_as("SELECT version FROM _schema_version LIMIT 1")
        .fetch_one(db.pool())
        .await
        .expect("Failed to read schema version");
    assert_eq!(version, 2);
}

#[tokio::test]
async fn test_reopening_an_existing_database_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");

    let first = Database::open(&db_path)
        .await
        .expect("Failed to open database");
    let article_id = insert_article(first.pool(), "Title", "Body")
        .await
        .expect("Failed to insert article");
    drop(first);

    let second = Database::open(&db_path)
        .await
        .expect("Failed to reopen database");
    let article = get_article(second.pool(), article_id)
        .await
        .expect("Failed to fetch article")
        .expect("Article not found");
    assert_eq!(article.title, "Title");
}

#[tokio::test]
async fn test_articles_shared_at_starts_null_and_is_stampable() {
    let (db, _temp_dir) = setup_db().await;

    let id = insert_article(db.pool(), "Sharing is caring", "Body text")
        .await
        .expect("Failed to insert article");

    let article = get_article(db.pool(), id)
        .await
        .expect("Failed to fetch article")
        .expect("Article not found");
    assert_eq!(article.shared_at, None);
    assert_eq!(article.approved_at, None);

    mark_article_shared(db.pool(), id)
        .await
        .expect("Failed to mark article shared");

    let shared = get_article(db.pool(), id)
        .await
        .expect("Failed to fetch article")
        .expect("Article not found");
    let shared_at = shared.shared_at.expect("shared_at should be set");
    assert!(!shared_at.is_empty());
}
