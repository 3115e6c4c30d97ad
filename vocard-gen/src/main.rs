//! vocard - vocabulary spreadsheets to multimedia flashcards
//!
//! Reads one or more CSV files of vocabulary rows, enriches every row with
//! pronunciation audio and (where it makes sense) an illustrative image, and
//! writes the assembled cards as JSON lines.
//!
//! Generated media is cached by content hash in `<root>/vocard.db`, so
//! re-running over the same vocabulary calls no generator.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocard_common::config::{self as cfg, RootFolderLayout, RootFolderResolver, TomlConfig};
use vocard_gen::providers::{CommandAudioGenerator, PexelsImageGenerator, UnconfiguredImageGenerator};
use vocard_gen::sources::CsvRowSource;
use vocard_gen::store::{MemoryAssetStore, SqliteAssetStore};
use vocard_gen::types::{AssetStore, ImageGenerator};
use vocard_gen::{MediaEnricher, Pipeline, PipelineEvent, TemplateRegistry};

/// Command-line arguments for vocard
#[derive(Parser, Debug)]
#[command(name = "vocard")]
#[command(about = "Build multimedia flashcards from vocabulary spreadsheets")]
#[command(version, long_version = env!("VOCARD_LONG_VERSION"))]
struct Args {
    /// CSV files to process (category from --category, a `category` column or the file name)
    #[arg(required_unless_present = "write_default_config")]
    inputs: Vec<PathBuf>,

    /// Category for every input file
    #[arg(short = 'C', long)]
    category: Option<String>,

    /// Configuration file (default: <config dir>/vocard/vocard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder for the asset database and media files
    /// (falls back to VOCARD_ROOT_FOLDER, then the config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Write cards here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write progress events (JSON lines) to this file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Keep the asset cache in memory (nothing persisted between runs)
    #[arg(long)]
    memory_store: bool,

    /// Abort the whole batch on the first failing row
    #[arg(long)]
    all_or_nothing: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    write_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.write_default_config {
        let path = args
            .config
            .clone()
            .or_else(cfg::default_config_path)
            .context("No configuration directory available; pass --config")?;
        cfg::write_toml_config(&TomlConfig::default(), &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = cfg::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config)?;

    info!(
        "Starting vocard {} ({} {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    );

    // Root folder: CLI → env → TOML → platform default, all in RootFolderResolver
    let layout = RootFolderLayout::new(RootFolderResolver::new(args.root_folder.clone(), &config).resolve());
    layout
        .ensure_directories()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", layout.root().display());

    let store: Arc<dyn AssetStore> = if args.memory_store {
        info!("Using in-memory asset store");
        Arc::new(MemoryAssetStore::new())
    } else {
        let db_path = layout.database_path();
        Arc::new(
            SqliteAssetStore::connect(&db_path)
                .await
                .with_context(|| format!("Failed to open asset database {}", db_path.display()))?,
        )
    };

    let audio = Arc::new(CommandAudioGenerator::new(config.audio.clone(), layout.media_dir()));
    let image: Arc<dyn ImageGenerator> = match cfg::resolve_pexels_api_key(&config) {
        Some(key) => Arc::new(
            PexelsImageGenerator::new(key, layout.media_dir()).context("Failed to set up Pexels client")?,
        ),
        None => {
            warn!("No Pexels API key configured; cards will have no images");
            Arc::new(UnconfiguredImageGenerator::new("no Pexels API key configured"))
        }
    };

    let templates = match &config.templates {
        Some(path) => TemplateRegistry::load(path)
            .with_context(|| format!("Failed to load templates from {}", path.display()))?,
        None => TemplateRegistry::builtin(),
    };

    let enricher = MediaEnricher::new(audio, image, store, config.enrichment.clone());
    let mut pipeline = Pipeline::new(enricher, templates);

    let event_writer = match &args.events {
        Some(path) => {
            let (tx, rx) = mpsc::channel(256);
            pipeline = pipeline.with_events(tx);
            let file = File::create(path)
                .with_context(|| format!("Failed to create events file {}", path.display()))?;
            Some(tokio::spawn(write_events(rx, BufWriter::new(file))))
        }
        None => None,
    };

    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling remaining rows");
            cancel.cancel();
        }
    });

    let mut sources = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let source = CsvRowSource::open(input, args.category.as_deref())
            .with_context(|| format!("Failed to open {}", input.display()))?;
        sources.push(source);
    }
    let rows = sources.into_iter().flatten();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let failed = if args.all_or_nothing {
        let cards = match pipeline.run_all_or_nothing(rows).await {
            Ok(cards) => cards,
            Err(e) => bail!("Batch aborted: {}", e),
        };
        for card in &cards {
            serde_json::to_writer(&mut out, card)?;
            writeln!(out)?;
        }
        info!("{} cards written", cards.len());
        0
    } else {
        let results = pipeline.run(rows).await;
        let mut failed = 0;
        for result in &results {
            match result {
                Ok(card) => {
                    serde_json::to_writer(&mut out, card)?;
                    writeln!(out)?;
                }
                Err(e) => {
                    failed += 1;
                    error!("{}", e);
                }
            }
        }
        info!("{} cards written, {} rows failed", results.len() - failed, failed);
        failed
    };
    out.flush()?;

    drop(pipeline);
    if let Some(handle) = event_writer {
        handle.await.context("Event writer panicked")??;
    }

    if failed > 0 {
        bail!("{} rows failed", failed);
    }
    Ok(())
}

/// Console logging at the configured level (`RUST_LOG` wins), or a log file
fn init_logging(config: &TomlConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match &config.logging.file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

async fn write_events(
    mut rx: mpsc::Receiver<PipelineEvent>,
    mut out: BufWriter<File>,
) -> Result<()> {
    while let Some(event) = rx.recv().await {
        serde_json::to_writer(&mut out, &event)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_folder_flag_is_only_the_cli_value() {
        let args = Args::try_parse_from(["vocard", "nouns.csv"]).unwrap();
        assert_eq!(args.root_folder, None);
        assert_eq!(args.inputs, [PathBuf::from("nouns.csv")]);

        let args = Args::try_parse_from(["vocard", "-r", "/tmp/vocard", "nouns.csv"]).unwrap();
        assert_eq!(args.root_folder, Some(PathBuf::from("/tmp/vocard")));
    }

    #[test]
    fn test_resolver_prefers_cli_root_folder() {
        let args = Args::try_parse_from(["vocard", "--root-folder", "/data/cards", "a.csv"]).unwrap();
        let config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        let root = RootFolderResolver::new(args.root_folder, &config).resolve();
        assert_eq!(root, PathBuf::from("/data/cards"));
    }
}
