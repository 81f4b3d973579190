//! End-to-end migration tests against in-memory SQLite

use std::sync::Arc;

use veranda_schema::{
    ColumnDefinition, ColumnType, DatabaseConnector, DefaultValue, IndexDefinition,
    MigrationRunner, SchemaError, SqlValue, SqliteConnector, TableSchema,
};

async fn memory_connector() -> Arc<SqliteConnector> {
    Arc::new(SqliteConnector::in_memory().await.unwrap())
}

fn posts_schema() -> TableSchema {
    TableSchema::new("posts")
        .with_column(
            ColumnDefinition::new("id", ColumnType::Integer)
                .primary_key()
                .auto_increment(),
        )
        .with_column(ColumnDefinition::new("title", ColumnType::Text).not_null())
        .with_column(ColumnDefinition::new("content", ColumnType::Text))
        .with_column(ColumnDefinition::new("published", ColumnType::Boolean).default_value(false))
}

#[tokio::test]
async fn test_create_then_rerun_is_idempotent() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector);
    let schema = posts_schema();

    assert!(runner.needs_migration(&schema).await.unwrap());

    let first = runner.run_migrations(std::slice::from_ref(&schema)).await.unwrap();
    assert_eq!(first.len(), 1);
    assert!(first[0].starts_with("CREATE TABLE IF NOT EXISTS posts"));

    assert!(!runner.needs_migration(&schema).await.unwrap());

    let second = runner.run_migrations(std::slice::from_ref(&schema)).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_missing_table_reports_all_columns_missing() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector);
    let schema = posts_schema();

    let missing = runner.missing_columns(&schema).await.unwrap();
    let names: Vec<&str> = missing.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "title", "content", "published"]);
}

#[tokio::test]
async fn test_additive_migration_preserves_existing_rows() {
    let connector = memory_connector().await;

    // Live table predates the declared content/published columns
    connector
        .execute(
            "CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL)",
            &[],
        )
        .await
        .unwrap();
    connector
        .execute(
            "INSERT INTO posts (title) VALUES (?)",
            &[SqlValue::from("Hello")],
        )
        .await
        .unwrap();

    let runner = MigrationRunner::sqlite(connector.clone());
    let schema = posts_schema();

    let missing = runner.missing_columns(&schema).await.unwrap();
    let names: Vec<&str> = missing.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["content", "published"]);

    let executed = runner.run_migrations(&[schema.clone()]).await.unwrap();
    assert_eq!(executed.len(), 2);
    assert!(executed[0].contains("ALTER TABLE posts ADD COLUMN"));
    assert!(executed[0].contains("content"));
    assert!(executed[1].contains("published"));
    assert!(executed[1].contains("DEFAULT 0"));

    // Existing data untouched, new columns visible in order
    let rows = connector.query("SELECT * FROM posts", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text("title"), Some("Hello"));
    assert!(rows[0].get("content").unwrap().is_null());

    let columns = runner.inspector().table_columns("posts").await.unwrap();
    assert_eq!(columns, vec!["id", "title", "content", "published"]);

    assert!(!runner.needs_migration(&schema).await.unwrap());
}

#[tokio::test]
async fn test_multi_table_batch() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector);

    let schemas = vec![
        TableSchema::new("users")
            .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key()),
        TableSchema::new("posts")
            .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key()),
        TableSchema::new("tags")
            .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key()),
    ];

    let executed = runner.run_migrations(&schemas).await.unwrap();
    assert_eq!(executed.len(), 3);
    for (sql, table) in executed.iter().zip(["users", "posts", "tags"]) {
        assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)));
    }

    for table in ["users", "posts", "tags"] {
        assert!(runner.inspector().table_exists(table).await);
    }
}

#[tokio::test]
async fn test_no_op_when_columns_match_in_any_order() {
    let connector = memory_connector().await;
    connector
        .execute("CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT)", &[])
        .await
        .unwrap();

    let runner = MigrationRunner::sqlite(connector);

    // Declared order differs from live order; only names matter
    let schema = TableSchema::new("posts")
        .with_column(ColumnDefinition::new("title", ColumnType::Text))
        .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key());

    assert!(!runner.needs_migration(&schema).await.unwrap());
    assert!(runner.missing_columns(&schema).await.unwrap().is_empty());
    assert!(runner.run_migrations(&[schema]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_declared_indexes_created_with_new_table() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector);

    let schema = TableSchema::new("users")
        .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key())
        .with_column(ColumnDefinition::new("email", ColumnType::Text).not_null())
        .with_index(IndexDefinition::new("idx_users_email", vec!["email".to_string()]).unique());

    let executed = runner.run_migrations(&[schema.clone()]).await.unwrap();
    assert_eq!(executed.len(), 2);
    assert!(executed[1].contains("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email"));

    // Second pass: table exists, nothing re-applied
    assert!(runner.run_migrations(&[schema]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inspector_absence_semantics() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector);
    let inspector = runner.inspector();

    assert!(!inspector.table_exists("ghosts").await);
    assert!(inspector.table_columns("ghosts").await.unwrap().is_empty());
    assert!(inspector.table_schema("ghosts").await.unwrap().is_none());
    assert!(inspector.table_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inspector_reconstructs_schema() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector);

    let declared = TableSchema::new("articles")
        .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key())
        .with_column(ColumnDefinition::new("title", ColumnType::Text).not_null())
        .with_column(ColumnDefinition::new("score", ColumnType::Real))
        .with_column(
            ColumnDefinition::new("note", ColumnType::Text).default_value("It's a test"),
        )
        .with_index(IndexDefinition::new("idx_articles_title", vec!["title".to_string()]).unique());

    runner.run_migrations(&[declared]).await.unwrap();

    let live = runner
        .inspector()
        .table_schema("articles")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(live.name, "articles");
    assert_eq!(live.column_names(), vec!["id", "title", "score", "note"]);

    let id = live.column("id").unwrap();
    assert!(id.primary_key);
    assert_eq!(id.column_type, ColumnType::Integer);

    let title = live.column("title").unwrap();
    assert!(!title.nullable);
    assert_eq!(title.column_type, ColumnType::Text);

    assert_eq!(live.column("score").unwrap().column_type, ColumnType::Real);
    assert_eq!(
        live.column("note").unwrap().default,
        Some(DefaultValue::Text("It's a test".to_string()))
    );

    let index = live
        .indexes
        .iter()
        .find(|i| i.name == "idx_articles_title")
        .expect("unique index visible in catalog");
    assert!(index.unique);
    assert_eq!(index.columns, vec!["title"]);
}

#[tokio::test]
async fn test_quoted_default_round_trips_through_database() {
    let connector = memory_connector().await;
    let runner = MigrationRunner::sqlite(connector.clone());

    let schema = TableSchema::new("notes").with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key());
    runner.run_migrations(&[schema]).await.unwrap();

    let widened = TableSchema::new("notes")
        .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key())
        .with_column(ColumnDefinition::new("body", ColumnType::Text).default_value("It's a test"));

    let executed = runner.run_migrations(&[widened]).await.unwrap();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].contains("DEFAULT 'It''s a test'"));

    // The default actually applies to new rows
    connector
        .execute("INSERT INTO notes (id) VALUES (1)", &[])
        .await
        .unwrap();
    let rows = connector
        .query("SELECT body FROM notes WHERE id = 1", &[])
        .await
        .unwrap();
    assert_eq!(rows[0].text("body"), Some("It's a test"));
}

#[tokio::test]
async fn test_failing_statement_aborts_run() {
    let connector = memory_connector().await;
    connector
        .execute("CREATE TABLE posts (id INTEGER PRIMARY KEY)", &[])
        .await
        .unwrap();
    connector
        .execute("INSERT INTO posts (id) VALUES (1)", &[])
        .await
        .unwrap();

    let runner = MigrationRunner::sqlite(connector.clone());

    // SQLite rejects adding a NOT NULL column without default to a
    // non-empty table; the pass must abort without touching later tables.
    let bad = TableSchema::new("posts")
        .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key())
        .with_column(ColumnDefinition::new("required", ColumnType::Text).not_null());
    let never_reached = TableSchema::new("audit")
        .with_column(ColumnDefinition::new("id", ColumnType::Integer).primary_key());

    let result = runner.run_migrations(&[bad, never_reached]).await;
    assert!(matches!(result, Err(SchemaError::Migration(_))));
    assert!(!runner.inspector().table_exists("audit").await);
}

#[tokio::test]
async fn test_connector_value_decoding() {
    let connector = memory_connector().await;
    connector
        .execute(
            "CREATE TABLE samples (i INTEGER, r REAL, t TEXT, b BLOB)",
            &[],
        )
        .await
        .unwrap();
    connector
        .execute(
            "INSERT INTO samples (i, r, t, b) VALUES (?, ?, ?, ?)",
            &[
                SqlValue::Integer(42),
                SqlValue::Real(1.5),
                SqlValue::from("hello"),
                SqlValue::Blob(vec![1, 2, 3]),
            ],
        )
        .await
        .unwrap();

    let rows = connector.query("SELECT * FROM samples", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].integer("i"), Some(42));
    assert_eq!(rows[0].get("r").unwrap().as_real(), Some(1.5));
    assert_eq!(rows[0].text("t"), Some("hello"));
    assert_eq!(rows[0].get("b").unwrap().as_blob(), Some(&[1u8, 2, 3][..]));
}
