//! Runs a `CreateSlab` batch against an in-memory document.
//!
//! ```text
//! slabport batch.json                                   # default stories and config
//! slabport batch.json --stories stories.json -v         # custom story table, info logs
//! slabport batch.json --config config.json --report     # list skipped items on stderr
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;

use slabport::document::{Stories, Story};
use slabport::{CommandConfig, CreateSlab, MemoryDocument};

#[derive(Parser)]
#[command(name = "slabport", about = "Create or update slabs from a JSON batch", version)]
struct Cli {
    /// Batch document: `{ "slabs": [...] }`
    batch: PathBuf,

    /// Command config (transaction name, name tables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Story table: `[{ "index": 0, "level": 0.0 }, ...]`
    #[arg(long)]
    stories: Option<PathBuf>,

    /// Print skipped items with their errors to stderr
    #[arg(long)]
    report: bool,

    /// Enable info-level logs
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logs
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "slabport=info".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = match &cli.config {
        Some(path) => CommandConfig::from_json_str(&read(path)?)
            .with_context(|| format!("parsing {}", path.display()))?,
        None => CommandConfig::default(),
    };
    let stories = match &cli.stories {
        Some(path) => {
            let stories: Vec<Story> = serde_json::from_str(&read(path)?)
                .with_context(|| format!("parsing {}", path.display()))?;
            Stories::new(stories)
        }
        None => Stories::default(),
    };
    let parameters: Value = serde_json::from_str(&read(&cli.batch)?)
        .with_context(|| format!("parsing {}", cli.batch.display()))?;

    let mut document = MemoryDocument::with_stories(stories);
    let command = CreateSlab::new(config);
    let result = command.run(&mut document, &parameters)?;

    if cli.report {
        eprintln!(
            "{}: {} written, {} skipped",
            command.config().transaction_name,
            result.element_ids.len(),
            result.failures.len()
        );
        for failure in &result.failures {
            eprintln!("item {}: {}", failure.index, failure.error);
        }
    }
    println!("{}", serde_json::to_string_pretty(&result.to_document())?);
    Ok(())
}
