// ABOUTME: CLI entry point for pg-table-compare
// ABOUTME: Loads settings, runs the interactive comparison, reports fatal errors

use clap::Parser;
use pg_table_compare::commands;
use pg_table_compare::config::{self, CompareConfig, StatusEncoding};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pg-table-compare")]
#[command(
    about = "Compare base tables and row counts between two PostgreSQL schemas",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to a TOML file with comparison settings
    #[arg(long = "config")]
    config_path: Option<PathBuf>,
    /// Tables to exclude from both sides (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,
    /// Also write an HTML report next to the CSV
    #[arg(long)]
    html: bool,
    /// Last CSV column: status label or counts_match boolean
    #[arg(long, value_enum)]
    status_encoding: Option<StatusEncoding>,
    /// Directory for the CSV and HTML reports
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Password attempts per database before giving up
    #[arg(long)]
    max_password_attempts: Option<u32>,
    /// Skip the interactive exclusion prompt
    #[arg(long)]
    no_exclusion_prompt: bool,
}

impl Cli {
    /// Resolve the run configuration: file values first, then flags
    fn into_config(self) -> anyhow::Result<CompareConfig> {
        let mut config = match &self.config_path {
            Some(path) => config::load_from_file(path)?,
            None => CompareConfig::default(),
        };

        config.exclusions.extend(
            self.exclude
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        );
        if self.html {
            config.emit_html = true;
        }
        if let Some(encoding) = self.status_encoding {
            config.status_encoding = encoding;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(attempts) = self.max_password_attempts {
            config.max_password_attempts = attempts;
        }
        if self.no_exclusion_prompt {
            config.prompt_for_exclusions = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("🔥 Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    commands::compare(config).await?;
    Ok(())
}
