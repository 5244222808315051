//! Integration tests for thread creation, updates, and the deletion cascade.

use forum_thread_store::db::{
    attach_tag, get_thread, get_thread_by_slug, insert_reply, insert_tag, insert_thread,
    replies_for_thread, update_thread, Database, NewReply, NewThread, Repliable, Taggable,
};
use forum_thread_store::forum::{delete_thread, slugify, unique_slug};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::open(&db_path)
        .await
        .expect("Failed to open database");
    (db, temp_dir)
}

async fn create_thread(pool: &SqlitePool, subject: &str) -> i64 {
    let slug = unique_slug(pool, subject)
        .await
        .expect("Failed to derive slug");
    insert_thread(
        pool,
        &NewThread {
            subject: subject.to_string(),
            body: "the body".to_string(),
            ip: "203.0.113.7".to_string(),
            slug,
        },
    )
    .await
    .expect("Failed to insert thread")
}

async fn count_rows(pool: &SqlitePool, sql: &str, thread_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as(sql)
        .bind(thread_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    count
}

#[tokio::test]
async fn test_create_and_fetch_thread() {
    let (db, _temp_dir) = setup_db().await;

    let id = create_thread(db.pool(), "Hello World").await;

    let by_id = get_thread(db.pool(), id)
        .await
        .expect("Failed to fetch thread")
        .expect("Thread not found");
    assert_eq!(by_id.subject, "Hello World");
    assert_eq!(by_id.ip, "203.0.113.7");
    assert_eq!(by_id.slug, "hello-world");
    assert_eq!(by_id.solution_reply_id, None);
    assert!(by_id.created_at_parsed().is_some());

    let by_slug = get_thread_by_slug(db.pool(), "hello-world")
        .await
        .expect("Failed to fetch thread by slug")
        .expect("Thread not found by slug");
    assert_eq!(by_slug.id, id);
}

#[tokio::test]
async fn test_unique_slug_suffixes_on_collision() {
    let (db, _temp_dir) = setup_db().await;

    create_thread(db.pool(), "Hello World").await;
    let second = unique_slug(db.pool(), "Hello World")
        .await
        .expect("Failed to derive slug");
    assert_eq!(second, "hello-world-2");

    insert_thread(
        db.pool(),
        &NewThread {
            subject: "Hello World".to_string(),
            body: "body".to_string(),
            ip: "127.0.0.1".to_string(),
            slug: second,
        },
    )
    .await
    .expect("Failed to insert second thread");

    let third = unique_slug(db.pool(), "Hello World")
        .await
        .expect("Failed to derive slug");
    assert_eq!(third, "hello-world-3");

    assert_eq!(slugify("Hello World"), "hello-world");
}

#[tokio::test]
async fn test_update_thread_touches_updated_at() {
    let (db, _temp_dir) = setup_db().await;

    let id = create_thread(db.pool(), "Original").await;
    sqlx::query("UPDATE threads SET updated_at = '2020-01-01 00:00:00' WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await
        .expect("Failed to backdate thread");

    update_thread(db.pool(), id, "Edited", "new body")
        .await
        .expect("Failed to update thread");

    let stored = get_thread(db.pool(), id)
        .await
        .expect("Failed to fetch thread")
        .expect("Thread not found");
    assert_eq!(stored.subject, "Edited");
    assert_eq!(stored.body, "new body");
    assert_ne!(stored.updated_at, "2020-01-01 00:00:00");
}

#[tokio::test]
async fn test_replies_come_back_oldest_first() {
    let (db, _temp_dir) = setup_db().await;

    let id = create_thread(db.pool(), "Replied").await;
    for n in 1..=3 {
        let reply_id = insert_reply(
            db.pool(),
            &NewReply {
                body: format!("reply {n}"),
                replyable: Repliable::Thread(id),
            },
        )
        .await
        .expect("Failed to insert reply");

        sqlx::query("UPDATE replies SET created_at = ? WHERE id = ?")
            .bind(format!("2024-01-0{n} 00:00:00"))
            .bind(reply_id)
            .execute(db.pool())
            .await
            .expect("Failed to pin reply created_at");
    }

    let replies = replies_for_thread(db.pool(), id)
        .await
        .expect("Failed to fetch replies");
    let bodies: Vec<&str> = replies.iter().map(|r| r.body.as_str()).collect();
    assert_eq!(bodies, vec!["reply 1", "reply 2", "reply 3"]);
}

#[tokio::test]
async fn test_delete_thread_cascades_to_replies_and_tag_links() {
    let (db, _temp_dir) = setup_db().await;

    let id = create_thread(db.pool(), "Doomed").await;
    for _ in 0..2 {
        insert_reply(
            db.pool(),
            &NewReply {
                body: "reply".to_string(),
                replyable: Repliable::Thread(id),
            },
        )
        .await
        .expect("Failed to insert reply");
    }
    let tag_id = insert_tag(db.pool(), "doomed-tag")
        .await
        .expect("Failed to insert tag");
    attach_tag(db.pool(), tag_id, Taggable::Thread(id))
        .await
        .expect("Failed to attach tag");

    delete_thread(db.pool(), id)
        .await
        .expect("Failed to delete thread");

    assert!(get_thread(db.pool(), id)
        .await
        .expect("Failed to fetch thread")
        .is_none());

    let replies = count_rows(
        db.pool(),
        "SELECT COUNT(*) FROM replies WHERE replyable_type = 'threads' AND replyable_id = ?",
        id,
    )
    .await;
    assert_eq!(replies, 0);

    let tag_links = count_rows(
        db.pool(),
        "SELECT COUNT(*) FROM taggables WHERE taggable_type = 'threads' AND taggable_id = ?",
        id,
    )
    .await;
    assert_eq!(tag_links, 0);

    // The tag itself survives; only the association is removed.
    let (tags,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_one(db.pool())
        .await
        .expect("Failed to count tags");
    assert_eq!(tags, 1);
}

#[tokio::test]
async fn test_delete_leaves_other_threads_untouched() {
    let (db, _temp_dir) = setup_db().await;

    let doomed = create_thread(db.pool(), "Doomed").await;
    let survivor = create_thread(db.pool(), "Survivor").await;
    insert_reply(
        db.pool(),
        &NewReply {
            body: "kept".to_string(),
            replyable: Repliable::Thread(survivor),
        },
    )
    .await
    .expect("Failed to insert reply");

    delete_thread(db.pool(), doomed)
        .await
        .expect("Failed to delete thread");

    assert!(get_thread(db.pool(), survivor)
        .await
        .expect("Failed to fetch thread")
        .is_some());
    let replies = replies_for_thread(db.pool(), survivor)
        .await
        .expect("Failed to fetch replies");
    assert_eq!(replies.len(), 1);
}

#[tokio::test]
async fn test_delete_missing_thread_is_a_noop() {
    let (db, _temp_dir) = setup_db().await;

    delete_thread(db.pool(), 9999)
        .await
        .expect("Deleting a missing thread should not fail");
}
