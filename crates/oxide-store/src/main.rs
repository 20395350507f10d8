//! oxide-store CLI
//!
//! Command-line tool for creating and maintaining model tables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_store::prelude::*;

/// Creates and maintains database tables for oxide-store models.
#[derive(Parser)]
#[command(name = "oxide-store")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (file path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:store.sqlite3")]
    database: String,

    /// JSON schema file listing the model classes.
    #[arg(short, long, env = "OXIDE_STORE_SCHEMA", default_value = "schema.json")]
    schema: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statements for classes without executing them.
    Sql {
        /// Class name (all if not specified).
        #[arg(short, long)]
        class: Option<String>,

        /// Show ANALYZE statements instead of setup statements.
        #[arg(short, long)]
        analyze: bool,
    },

    /// Create missing tables and indexes.
    Setup {
        /// Class name (all if not specified).
        #[arg(short, long)]
        class: Option<String>,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Refresh query planner statistics.
    Analyze {
        /// Class name (all if not specified).
        #[arg(short, long)]
        class: Option<String>,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let schema = SchemaFile::from_path(cli.schema)?;

    match cli.command {
        Commands::Sql { class, analyze } => {
            for class in schema.select(class.as_deref())? {
                let statements = if analyze {
                    analyze_queries_for_class(class)
                } else {
                    setup_queries_for_class(class)?
                };
                for sql in statements {
                    println!("{sql};");
                }
            }
        }

        Commands::Setup { class, dry_run } => {
            let classes = schema.select(class.as_deref())?;
            let executor = SchemaExecutor::connect(&cli.database, dry_run).await?;
            executor.setup_all(classes).await?;
            info!("Schema is up to date.");
        }

        Commands::Analyze { class, dry_run } => {
            let classes = schema.select(class.as_deref())?;
            let executor = SchemaExecutor::connect(&cli.database, dry_run).await?;
            executor.analyze_all(classes).await?;
            info!("Statistics refreshed.");
        }
    }

    Ok(())
}
