use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use schema_gen::config::{self, BackendKind};
use schema_gen::utils::logging::init_logging;
use schema_gen::{BarProgress, CancellationToken, Progress, SilentProgress};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Mysql,
    Json,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Mysql => BackendKind::Mysql,
            BackendArg::Json => BackendKind::Json,
        }
    }
}

/// Generate one file per table from a YAML database schema
#[derive(Debug, Parser)]
#[command(name = "schema_gen", version, about)]
struct Cli {
    /// Path to the YAML schema
    schema: PathBuf,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Code backend
    #[arg(short, long, value_enum)]
    backend: Option<BackendArg>,

    /// File extension of generated files
    #[arg(short, long)]
    extension: Option<String>,

    /// Configuration file (defaults to ./schema_gen.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_or_default(cli.config.as_deref())?;
    if let Some(out) = &cli.out {
        config.output.directory = out.display().to_string();
    }
    if let Some(backend) = cli.backend {
        config.backend.kind = backend.into();
    }
    if let Some(extension) = cli.extension {
        config.output.extension = Some(extension);
    }
    let mut logging = config.logging.clone().unwrap_or_default();
    if let Some(level) = cli.log_level {
        logging.level = level;
    } else if config.logging.is_none() {
        logging.level = "warn".to_string();
    }
    init_logging(&Some(logging))?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current table");
            signal_token.cancel();
        }
    });

    let progress: Box<dyn Progress> = if cli.quiet {
        Box::new(SilentProgress::new())
    } else {
        Box::new(BarProgress::new())
    };

    let summary = schema_gen::generate(&config, &cli.schema, progress.as_ref(), &cancel)
        .await
        .with_context(|| format!("failed to generate from {}", cli.schema.display()))?;

    if !cli.quiet {
        println!(
            "Generated {} table(s) into {}",
            summary.tables, config.output.directory
        );
    }

    Ok(())
}
