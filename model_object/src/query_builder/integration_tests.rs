//! Terminal operation tests
//!
//! Runs whole chains against an in-memory executor that records every
//! statement and answers from a script.

#[cfg(test)]
mod integration_tests {
    use crate::errors::{ExecutorError, ModelError};
    use crate::query_builder::{QueryOperator, Statement};
    use crate::relation::RelationDef;
    use crate::traits::{DatabaseExecutor, Model};
    use crate::validation::ValidationError;
    use crate::Row;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Reply {
        Rows(Vec<Value>),
        Count(i64),
        Inserted(Option<Value>),
        Affected(u64),
        Fail,
    }

    #[derive(Default)]
    struct RecordingExecutor {
        replies: Mutex<VecDeque<Reply>>,
        statements: Mutex<Vec<Statement>>,
    }

    impl RecordingExecutor {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                statements: Mutex::new(Vec::new()),
            }
        }

        fn next(&self, statement: &Statement) -> Reply {
            self.statements.lock().unwrap().push(statement.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("executor ran out of scripted replies")
        }

        fn statements(&self) -> Vec<Statement> {
            self.statements.lock().unwrap().clone()
        }
    }

    fn as_row(value: Value) -> Row {
        match value {
            Value::Object(row) => row,
            other => panic!("expected object row, got {}", other),
        }
    }

    fn failure() -> ExecutorError {
        ExecutorError::Decode("scripted failure".to_string())
    }

    #[async_trait]
    impl DatabaseExecutor for RecordingExecutor {
        async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, ExecutorError> {
            match self.next(statement) {
                Reply::Rows(rows) => Ok(rows.into_iter().map(as_row).collect()),
                Reply::Fail => Err(failure()),
                _ => panic!("unexpected fetch_all: {}", statement.sql),
            }
        }

        async fn fetch_count(&self, statement: &Statement) -> Result<i64, ExecutorError> {
            match self.next(statement) {
                Reply::Count(total) => Ok(total),
                Reply::Fail => Err(failure()),
                _ => panic!("unexpected fetch_count: {}", statement.sql),
            }
        }

        async fn insert(&self, statement: &Statement) -> Result<Option<Row>, ExecutorError> {
            match self.next(statement) {
                Reply::Inserted(row) => Ok(row.map(as_row)),
                Reply::Fail => Err(failure()),
                _ => panic!("unexpected insert: {}", statement.sql),
            }
        }

        async fn execute(&self, statement: &Statement) -> Result<u64, ExecutorError> {
            match self.next(statement) {
                Reply::Affected(n) => Ok(n),
                Reply::Fail => Err(failure()),
                _ => panic!("unexpected execute: {}", statement.sql),
            }
        }
    }

    struct Post;

    impl Model for Post {
        fn fillable() -> &'static [&'static str] {
            &["title", "body", "status"]
        }

        fn hidden() -> &'static [&'static str] {
            &["secret"]
        }

        fn soft_delete_column() -> Option<&'static str> {
            Some("deleted_at")
        }

        fn relations() -> &'static [RelationDef] {
            const RELATIONS: &[RelationDef] = &[
                RelationDef::has_many("comments", "comments", "post_id"),
                RelationDef::has_one("author", "users", "user_id"),
            ];
            RELATIONS
        }
    }

    struct Tag;

    impl Model for Tag {
        fn fillable() -> &'static [&'static str] {
            &["name"]
        }
    }

    #[derive(Serialize)]
    struct NewPost<'a> {
        title: &'a str,
        body: &'a str,
        views: u32,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct PostSummary {
        id: i64,
        title: String,
    }

    // ========================================
    // get / first / find
    // ========================================

    #[tokio::test]
    async fn test_get_hydrates_relations_and_hides_columns() {
        let db = RecordingExecutor::new(vec![Reply::Rows(vec![
            json!({
                "id": 1,
                "title": "First",
                "secret": "s3cret",
                "comments": [{"id": 10, "body": "Nice"}, {"id": 11, "body": "Agreed"}],
                "users": [{"name": "Ana"}]
            }),
            json!({
                "id": 2,
                "title": "Second",
                "secret": null,
                "comments": [],
                "users": []
            }),
        ])]);

        let rows = Post::with("comments", &["id", "body"])
            .with("author", &["name"])
            .get(&db)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0]["comments"],
            json!([{"id": 10, "body": "Nice"}, {"id": 11, "body": "Agreed"}])
        );
        assert_eq!(rows[0]["author"], json!({"name": "Ana"}));
        assert_eq!(rows[1]["comments"], json!([]));
        assert_eq!(rows[1]["author"], Value::Null);
        assert!(!rows[0].contains_key("secret"));
        assert!(!rows[0].contains_key("users"));

        let statements = db.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].sql.contains("FROM comments AS related WHERE related.post_id = posts.id"));
        assert!(!statements[0].sql.contains("GROUP BY"));
    }

    #[tokio::test]
    async fn test_get_as_deserializes_rows() {
        let db = RecordingExecutor::new(vec![Reply::Rows(vec![
            json!({"id": 1, "title": "First", "body": "..."}),
        ])]);

        let posts: Vec<PostSummary> = Post::query().get_as(&db).await.unwrap();
        assert_eq!(
            posts,
            vec![PostSummary {
                id: 1,
                title: "First".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = RecordingExecutor::new(vec![
            Reply::Rows(vec![json!({"id": 7, "title": "Found"})]),
            Reply::Rows(vec![]),
        ]);

        let found = Post::find_by_id(&db, 7).await.unwrap();
        assert_eq!(found.unwrap()["title"], json!("Found"));

        let missing = Post::find_by_id(&db, 8).await.unwrap();
        assert!(missing.is_none());

        let statements = db.statements();
        assert_eq!(
            statements[0].sql,
            "SELECT * FROM posts WHERE posts.id = $1 AND posts.deleted_at IS NULL LIMIT 1"
        );
        assert_eq!(statements[0].params, vec![json!(7)]);
    }

    #[tokio::test]
    async fn test_validation_error_skips_database() {
        let db = RecordingExecutor::new(vec![]);

        let err = Post::with("likes", &[]).get(&db).await.unwrap_err();
        assert!(matches!(
            err,
            ModelError::Validation(ValidationError::UnknownRelation { .. })
        ));
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_executor_failure_names_operation() {
        let db = RecordingExecutor::new(vec![Reply::Fail]);

        let err = Tag::query().get(&db).await.unwrap_err();
        match err {
            ModelError::QueryExecution {
                table, operation, ..
            } => {
                assert_eq!(table, "tags");
                assert_eq!(operation, "get");
            }
            other => panic!("expected QueryExecution, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_aggregate_is_hydration_error() {
        let db = RecordingExecutor::new(vec![Reply::Rows(vec![
            json!({"id": 1, "comments": "{broken"}),
        ])]);

        let err = Post::with("comments", &[]).get(&db).await.unwrap_err();
        assert!(matches!(err, ModelError::Hydration { .. }));
    }

    // ========================================
    // create
    // ========================================

    #[tokio::test]
    async fn test_create_inserts_fillable_and_reads_back() {
        let db = RecordingExecutor::new(vec![
            Reply::Inserted(Some(json!({"id": 42}))),
            Reply::Rows(vec![json!({"id": 42, "title": "Hello", "body": "World", "secret": "x"})]),
        ]);

        let created = Post::create(
            &db,
            &NewPost {
                title: "Hello",
                body: "World",
                views: 3,
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(created["id"], json!(42));
        assert!(!created.contains_key("secret"));

        let statements = db.statements();
        assert_eq!(
            statements[0].sql,
            "INSERT INTO posts (title, body) SELECT title, body \
             FROM jsonb_populate_record(NULL::posts, $1) RETURNING id"
        );
        assert_eq!(
            statements[0].params,
            vec![json!({"title": "Hello", "body": "World"})]
        );
        assert_eq!(statements[1].params, vec![json!(42)]);
    }

    #[tokio::test]
    async fn test_create_without_returned_key() {
        let db = RecordingExecutor::new(vec![Reply::Inserted(None)]);

        let created = Tag::create(&db, &json!({"name": "rust"})).await.unwrap();
        assert!(created.is_none());
        assert_eq!(db.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_payload() {
        let db = RecordingExecutor::new(vec![]);

        let err = Tag::create(&db, &json!(["rust"])).await.unwrap_err();
        assert!(matches!(
            err,
            ModelError::Validation(ValidationError::ExpectedObject(_))
        ));
    }

    // ========================================
    // update / delete / restore
    // ========================================

    #[tokio::test]
    async fn test_update_drops_unknown_keys() {
        let db = RecordingExecutor::new(vec![Reply::Affected(2)]);

        let affected = Post::where_("status", QueryOperator::Eq, "draft")
            .update(&db, &json!({"status": "published", "id": 99}))
            .await
            .unwrap();

        assert_eq!(affected, 2);
        let statements = db.statements();
        assert_eq!(
            statements[0].sql,
            "UPDATE posts SET status = (SELECT status FROM jsonb_populate_record(NULL::posts, $1)), \
             updated_at = NOW() WHERE status = $2 AND posts.deleted_at IS NULL"
        );
        assert_eq!(
            statements[0].params,
            vec![json!({"status": "published"}), json!("draft")]
        );
    }

    #[tokio::test]
    async fn test_update_with_nothing_fillable() {
        let db = RecordingExecutor::new(vec![]);

        let err = Post::query()
            .update(&db, &json!({"id": 1}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::Validation(ValidationError::NothingToUpdate(_))
        ));
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_soft_delete_then_restore() {
        let db = RecordingExecutor::new(vec![Reply::Affected(1), Reply::Affected(1)]);

        Post::where_("id", QueryOperator::Eq, 5)
            .delete(&db)
            .await
            .unwrap();
        Post::where_("id", QueryOperator::Eq, 5)
            .restore(&db)
            .await
            .unwrap();

        let statements = db.statements();
        assert_eq!(
            statements[0].sql,
            "UPDATE posts SET deleted_at = NOW() WHERE id = $1 AND posts.deleted_at IS NULL"
        );
        assert_eq!(
            statements[1].sql,
            "UPDATE posts SET deleted_at = NULL WHERE id = $1 AND posts.deleted_at IS NOT NULL"
        );
    }

    #[tokio::test]
    async fn test_hard_delete_and_restore_noop() {
        let db = RecordingExecutor::new(vec![Reply::Affected(3)]);

        let removed = Tag::where_like("name", "old").delete(&db).await.unwrap();
        assert_eq!(removed, 3);

        let restored = Tag::query().restore(&db).await.unwrap();
        assert_eq!(restored, 0);

        let statements = db.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].sql, "DELETE FROM tags WHERE name LIKE $1");
    }

    #[tokio::test]
    async fn test_connection_unavailable() {
        let db = crate::executor::PgExecutor::unavailable();

        let err = Tag::query().count(&db).await.unwrap_err();
        assert!(matches!(err, ModelError::ConnectionUnavailable));
    }

    // ========================================
    // paginate
    // ========================================

    #[tokio::test]
    async fn test_paginate_middle_page() {
        let db = RecordingExecutor::new(vec![
            Reply::Count(23),
            Reply::Rows(vec![json!({"id": 11}), json!({"id": 12})]),
        ]);

        let page = Post::where_("status", QueryOperator::Eq, "published")
            .order_by_desc("id")
            .paginate(&db, 10, 2)
            .await
            .unwrap();

        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.data.len(), 2);

        let statements = db.statements();
        assert_eq!(
            statements[0].sql,
            "SELECT COUNT(*) FROM posts WHERE status = $1 AND posts.deleted_at IS NULL"
        );
        assert_eq!(
            statements[1].sql,
            "SELECT * FROM posts WHERE status = $1 AND posts.deleted_at IS NULL ORDER BY id DESC LIMIT 10 OFFSET 10"
        );
    }

    #[tokio::test]
    async fn test_paginate_clamps_to_last_page() {
        let db = RecordingExecutor::new(vec![Reply::Count(5), Reply::Rows(vec![json!({"id": 5})])]);

        let page = Tag::query().paginate(&db, 2, 99).await.unwrap();
        assert_eq!(page.page, 3);
        assert!(db.statements()[1].sql.ends_with("LIMIT 2 OFFSET 4"));
    }

    #[tokio::test]
    async fn test_paginate_empty_skips_data_query() {
        let db = RecordingExecutor::new(vec![Reply::Count(0)]);

        let page = Tag::query().paginate(&db, 10, 1).await.unwrap();
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 0);
        assert!(page.data.is_empty());
        assert_eq!(db.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_paginate_with_relations_counts_parents() {
        let db = RecordingExecutor::new(vec![
            Reply::Count(1),
            Reply::Rows(vec![json!({"id": 1, "comments": [{"id": 1}, {"id": 2}]})]),
        ]);

        let page = Post::with("comments", &["id"]).paginate(&db, 5, 1).await.unwrap();
        assert_eq!(page.data[0]["comments"], json!([{"id": 1}, {"id": 2}]));
        assert!(db.statements()[0].sql.starts_with("SELECT COUNT(DISTINCT posts.id)"));
    }

    #[tokio::test]
    async fn test_paginate_rejects_zero_page_size() {
        let db = RecordingExecutor::new(vec![]);

        let err = Tag::paginate(&db, 0, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ModelError::Validation(ValidationError::InvalidPageSize)
        ));
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_all_and_count() {
        let db = RecordingExecutor::new(vec![Reply::Rows(vec![json!({"id": 1})]), Reply::Count(1)]);

        assert_eq!(Tag::all(&db).await.unwrap().len(), 1);
        assert_eq!(Tag::query().count(&db).await.unwrap(), 1);
        assert_eq!(db.statements()[1].sql, "SELECT COUNT(*) FROM tags");
    }
}
