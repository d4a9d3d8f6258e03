// ABOUTME: CLI entry point for db2-table-copier
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Args, Parser, Subcommand};
use db2_table_copier::commands;
use db2_table_copier::config::{load_settings, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "db2-table-copier")]
#[command(about = "Copy DB2 tables between database aliases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct SettingsArgs {
    /// Path to a settings TOML file (default: db2-table-copier.toml if present)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,
    /// Databases input file
    #[arg(long = "databases", global = true)]
    databases_file: Option<PathBuf>,
    /// Tables input file
    #[arg(long = "tables", global = true)]
    tables_file: Option<PathBuf>,
    /// DB2 command line processor to run
    #[arg(long, global = true)]
    client: Option<String>,
    /// SQL predicate limiting the rows counted and exported (e.g. "CREATED > '2024-01-01'")
    #[arg(long, global = true)]
    row_filter: Option<String>,
}

impl SettingsArgs {
    fn resolve(self) -> anyhow::Result<Settings> {
        let mut settings = load_settings(self.config_path.as_deref())?;
        if let Some(path) = self.databases_file {
            settings.databases_file = path;
        }
        if let Some(path) = self.tables_file {
            settings.tables_file = path;
        }
        if let Some(client) = self.client {
            settings.client = client;
        }
        if self.row_filter.is_some() {
            settings.row_filter = self.row_filter;
        }
        Ok(settings)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Unload tables from SOURCE and load them into each TARGET
    Copy {
        /// Alias to unload from
        source: String,
        /// Aliases to load into
        #[arg(required = true)]
        targets: Vec<String>,
        /// Skip the overwrite confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show row counts of the configured tables on an alias
    Counts {
        alias: String,
    },
    /// Check the input files and that the DB2 client is available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = cli.settings.resolve()?;

    match cli.command {
        Commands::Copy {
            source,
            targets,
            yes,
        } => {
            let summary = commands::copy(&settings, &source, &targets, yes).await?;
            if summary.has_failures() {
                anyhow::bail!(
                    "Copy incomplete: failed unloads [{}], failed loads [{}], failed identity restarts [{}]",
                    summary.unload_failures.join(", "),
                    summary.load_failures.join(", "),
                    summary.restart_failures.join(", ")
                );
            }
            Ok(())
        }
        Commands::Counts { alias } => {
            commands::counts(&settings, &alias).await?;
            Ok(())
        }
        Commands::Check => commands::check(&settings),
    }
}
