mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "veranda")]
#[command(about = "veranda admin framework CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schema migration commands
    Migrate {
        #[command(subcommand)]
        migrate_command: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Apply pending schema changes to the database
    Run {
        /// Path to the JSON schema manifest
        #[arg(long, default_value = "schema.json")]
        schema: PathBuf,

        /// Database URL (falls back to DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,

        /// Print each executed SQL statement
        #[arg(long, short)]
        verbose: bool,
    },

    /// Show pending schema changes without applying them
    Status {
        /// Path to the JSON schema manifest
        #[arg(long, default_value = "schema.json")]
        schema: PathBuf,

        /// Database URL (falls back to DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },
}

fn database_url(flag: Option<String>) -> anyhow::Result<String> {
    if let Some(url) = flag {
        return Ok(url);
    }
    std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("No database URL: pass --database-url or set DATABASE_URL"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { migrate_command } => match migrate_command {
            MigrateCommands::Run {
                schema,
                database_url: url,
                verbose,
            } => commands::migrate::run(&schema, &database_url(url)?, verbose).await,
            MigrateCommands::Status {
                schema,
                database_url: url,
            } => commands::migrate::status(&schema, &database_url(url)?).await,
        },
    }
}
