use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use veranda_schema::{MigrationRunner, SqliteConnector, TableSchema};

/// Load declared table schemas from a JSON manifest: a top-level array of
/// table objects, deserialized straight into the schema model.
fn load_manifest(path: &Path) -> anyhow::Result<Vec<TableSchema>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema manifest: {}", path.display()))?;
    let schemas: Vec<TableSchema> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid schema manifest: {}", path.display()))?;
    Ok(schemas)
}

async fn runner_for(database_url: &str) -> anyhow::Result<MigrationRunner> {
    let connector = Arc::new(SqliteConnector::connect(database_url).await?);
    Ok(MigrationRunner::sqlite(connector))
}

pub async fn run(schema_path: &Path, database_url: &str, verbose: bool) -> anyhow::Result<()> {
    let schemas = load_manifest(schema_path)?;
    let runner = runner_for(database_url).await?;

    if verbose {
        println!(
            "Migrating {} table(s) at {}",
            schemas.len(),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let started = std::time::Instant::now();
    let executed = runner.run_migrations(&schemas).await?;

    if executed.is_empty() {
        println!("Nothing to migrate ({} table(s) up to date)", schemas.len());
    } else {
        println!(
            "Applied {} statement(s) in {}ms",
            executed.len(),
            started.elapsed().as_millis()
        );
        if verbose {
            for sql in &executed {
                println!("  {}", sql);
            }
        }
    }

    Ok(())
}

pub async fn status(schema_path: &Path, database_url: &str) -> anyhow::Result<()> {
    let schemas = load_manifest(schema_path)?;
    let runner = runner_for(database_url).await?;

    println!("Migration Status:");
    println!("================");

    let mut pending = 0;
    for schema in &schemas {
        if !runner.needs_migration(schema).await? {
            println!("  ✓ {}", schema.name);
            continue;
        }

        pending += 1;
        if !runner.inspector().table_exists(&schema.name).await {
            println!("  ⏳ {} (table missing)", schema.name);
        } else {
            let missing = runner.missing_columns(schema).await?;
            let names: Vec<&str> = missing.iter().map(|c| c.name.as_str()).collect();
            println!("  ⏳ {} (missing columns: {})", schema.name, names.join(", "));
        }
    }

    if pending == 0 {
        println!("\nAll tables up to date");
    } else {
        println!("\n{} table(s) pending migration", pending);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use veranda_schema::ColumnType;

    #[test]
    fn test_load_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{
                    "name": "posts",
                    "columns": [
                        {{"name": "id", "type": "integer", "primary_key": true, "auto_increment": true}},
                        {{"name": "title", "type": "text", "nullable": false}},
                        {{"name": "published", "type": "boolean", "default": false}}
                    ],
                    "indexes": [
                        {{"name": "idx_posts_title", "columns": ["title"]}}
                    ]
                }}
            ]"#
        )
        .unwrap();

        let schemas = load_manifest(file.path()).unwrap();
        assert_eq!(schemas.len(), 1);

        let posts = &schemas[0];
        assert_eq!(posts.name, "posts");
        assert_eq!(posts.column_names(), vec!["id", "title", "published"]);
        assert!(posts.column("id").unwrap().primary_key);
        assert!(!posts.column("title").unwrap().nullable);
        assert_eq!(posts.column("published").unwrap().column_type, ColumnType::Boolean);
        assert_eq!(posts.indexes[0].name, "idx_posts_title");
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let error = load_manifest(Path::new("does-not-exist.json")).unwrap_err();
        assert!(error.to_string().contains("Failed to read schema manifest"));
    }

    #[tokio::test]
    async fn test_run_against_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db");
        let url = format!("sqlite://{}", db_path.display());

        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "users", "columns": [{{"name": "id", "type": "integer", "primary_key": true}}]}}]"#
        )
        .unwrap();

        run(file.path(), &url, false).await.unwrap();

        // Second run is a no-op but must also succeed
        run(file.path(), &url, true).await.unwrap();
    }
}
