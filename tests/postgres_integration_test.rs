//! Integration tests against a live PostgreSQL database
//!
//! Run with `DATABASE_URL` pointing at a scratch database. Without it the
//! tests return early.

use lumin::prelude::*;
use sqlx::PgPool;

#[model]
#[table(name = "lumin_it_posts", soft_delete)]
#[has_many(name = "comments", table = "lumin_it_comments", foreign_key = "post_id")]
#[has_one(name = "author", table = "lumin_it_authors", foreign_key = "author_id", hidden = "pin")]
#[has_one(name = "latest_note", table = "lumin_it_notes", foreign_key = "id", local_key = "post_id")]
pub struct ItPost {
    #[primary_key]
    pub id: i64,

    #[field]
    pub title: String,

    #[field]
    pub status: String,

    #[field]
    pub author_id: Option<i64>,

    #[field(fillable, hidden)]
    pub secret: Option<String>,
}

#[model]
#[table(name = "lumin_it_comments", no_timestamps)]
pub struct ItComment {
    #[primary_key]
    pub id: i64,

    #[field]
    pub post_id: i64,

    #[field]
    pub body: String,
}

#[model]
#[table(name = "lumin_it_authors", no_timestamps)]
pub struct ItAuthor {
    #[primary_key]
    pub id: i64,

    #[field]
    pub name: String,

    #[field]
    pub pin: Option<String>,
}

#[model]
#[table(name = "lumin_it_notes", no_timestamps)]
pub struct ItNote {
    #[primary_key]
    pub id: i64,

    #[field]
    pub post_id: i64,

    #[field]
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct PostSummary {
    id: i64,
    title: String,
}

async fn setup_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    for statement in [
        "DROP TABLE IF EXISTS lumin_it_notes",
        "DROP TABLE IF EXISTS lumin_it_comments",
        "DROP TABLE IF EXISTS lumin_it_posts",
        "DROP TABLE IF EXISTS lumin_it_authors",
        "CREATE TABLE lumin_it_authors (id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, pin TEXT)",
        "CREATE TABLE lumin_it_posts (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            author_id BIGINT REFERENCES lumin_it_authors(id),
            secret TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )",
        "CREATE TABLE lumin_it_comments (
            id BIGSERIAL PRIMARY KEY,
            post_id BIGINT NOT NULL REFERENCES lumin_it_posts(id),
            body TEXT NOT NULL
        )",
        "CREATE TABLE lumin_it_notes (
            id BIGSERIAL PRIMARY KEY,
            post_id BIGINT NOT NULL REFERENCES lumin_it_posts(id),
            body TEXT NOT NULL
        )",
    ] {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to prepare schema");
    }

    Some(pool)
}

fn id_of(row: &Row) -> i64 {
    row["id"].as_i64().expect("row id")
}

// The scenarios share tables, so they run in one test
#[tokio::test]
async fn test_postgres_round_trip() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(());
    };
    let db = PgExecutor::new(pool);

    crud_and_relations(&db).await?;
    related_rows_keep_duplicates_and_order(&db).await?;
    nulls_and_plain_strings(&db).await?;
    pagination(&db).await?;
    Ok(())
}

async fn crud_and_relations(db: &PgExecutor) -> anyhow::Result<()> {
    let author = ItAuthor::create(db, &json!({ "name": "Ada", "pin": "1234" }))
        .await?
        .expect("author read back");

    let post = ItPost::create(
        db,
        &json!({
            "title": "Hello",
            "status": "published",
            "author_id": id_of(&author),
            "secret": "s3cret",
            "id": 999
        }),
    )
    .await?
    .expect("post read back");

    assert_eq!(post["title"], json!("Hello"));
    assert!(!post.contains_key("secret"));
    assert_ne!(id_of(&post), 999);

    for body in ["first", "second"] {
        ItComment::create(db, &json!({ "post_id": id_of(&post), "body": body })).await?;
    }

    let rows = ItPost::with("comments", &["id", "body"])
        .with("author", &["name"])
        .where_("status", QueryOperator::Eq, "published")
        .get(db)
        .await?;
    assert_eq!(rows.len(), 1);
    let comments = rows[0]["comments"].as_array().expect("comments list");
    assert_eq!(comments.len(), 2);
    assert_eq!(rows[0]["author"], json!({ "name": "Ada" }));

    let rows = ItPost::with("author", &[])
        .where_("id", QueryOperator::Eq, id_of(&post))
        .get(db)
        .await?;
    assert_eq!(rows[0]["author"]["name"], json!("Ada"));
    assert!(rows[0]["author"].get("pin").is_none());

    let found = ItPost::find_by_id(db, id_of(&post)).await?;
    assert!(found.is_some());

    let summaries: Vec<PostSummary> = ItPost::where_like("title", "ell").get_as(db).await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, id_of(&post));
    assert_eq!(summaries[0].title, "Hello");

    let updated = ItPost::where_("id", QueryOperator::Eq, id_of(&post))
        .update(db, &json!({ "title": "Hello again", "id": 5 }))
        .await?;
    assert_eq!(updated, 1);

    let deleted = ItPost::where_("id", QueryOperator::Eq, id_of(&post))
        .delete(db)
        .await?;
    assert_eq!(deleted, 1);
    assert!(ItPost::find_by_id(db, id_of(&post)).await?.is_none());
    assert_eq!(ItPost::only_trashed().count(db).await?, 1);

    let restored = ItPost::where_("id", QueryOperator::Eq, id_of(&post))
        .restore(db)
        .await?;
    assert_eq!(restored, 1);

    let post = ItPost::find_by_id(db, id_of(&post))
        .await?
        .expect("restored post");
    assert_eq!(post["title"], json!("Hello again"));

    Ok(())
}

async fn related_rows_keep_duplicates_and_order(db: &PgExecutor) -> anyhow::Result<()> {
    let post = ItPost::create(db, &json!({ "title": "Dupes", "status": "dupes" }))
        .await?
        .expect("post read back");

    for body in ["zeta", "alpha", "alpha"] {
        ItComment::create(db, &json!({ "post_id": id_of(&post), "body": body })).await?;
    }
    for body in ["older", "newer"] {
        ItNote::create(db, &json!({ "post_id": id_of(&post), "body": body })).await?;
    }

    let rows = ItPost::with("comments", &["body"])
        .with("latest_note", &["body"])
        .where_("status", QueryOperator::Eq, "dupes")
        .get(db)
        .await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["comments"],
        json!([{ "body": "zeta" }, { "body": "alpha" }, { "body": "alpha" }])
    );
    assert_eq!(rows[0]["latest_note"], json!({ "body": "older" }));

    let total = ItPost::with("comments", &[])
        .where_("status", QueryOperator::Eq, "dupes")
        .count(db)
        .await?;
    assert_eq!(total, 1);

    Ok(())
}

async fn nulls_and_plain_strings(db: &PgExecutor) -> anyhow::Result<()> {
    let post = ItPost::create(
        db,
        &json!({ "title": "No author", "status": "orphan", "author_id": null }),
    )
    .await?
    .expect("post read back");
    assert_eq!(post["author_id"], Value::Null);

    let updated = ItPost::where_("id", QueryOperator::Eq, id_of(&post))
        .update(db, &json!({ "author_id": null, "secret": null }))
        .await?;
    assert_eq!(updated, 1);

    for title in ["550e8400-e29b-41d4-a716-446655440000", "2024-01-01T00:00:00Z"] {
        let rows = ItPost::where_("title", QueryOperator::Eq, title).get(db).await?;
        assert!(rows.is_empty());
    }

    ItPost::where_("id", QueryOperator::Eq, id_of(&post))
        .force_delete(db)
        .await?;
    Ok(())
}

async fn pagination(db: &PgExecutor) -> anyhow::Result<()> {
    for n in 0..11 {
        ItPost::create(db, &json!({ "title": format!("bulk {}", n), "status": "bulk" })).await?;
    }

    let page = ItPost::where_("status", QueryOperator::Eq, "bulk")
        .order_by_asc("id")
        .paginate(db, 5, 3)
        .await?;
    assert_eq!(page.total, 11);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.data.len(), 1);

    let clamped = ItPost::where_("status", QueryOperator::Eq, "bulk")
        .paginate(db, 5, 40)
        .await?;
    assert_eq!(clamped.page, 3);

    let empty = ItPost::where_("status", QueryOperator::Eq, "missing")
        .paginate(db, 5, 1)
        .await?;
    assert_eq!(empty.total, 0);
    assert_eq!(empty.page, 0);
    assert!(empty.data.is_empty());

    Ok(())
}
