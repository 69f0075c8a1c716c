use anyhow::Context;
use clap::Parser;
use matledger::{CatalogLoader, LedgerExporter, MaterialsLoader, Pipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Reconcile a crafted-item catalog with real-world material data
#[derive(Parser, Debug)]
#[command(name = "matledger")]
#[command(
    about = "Build a priced material ledger from a catalog and material data",
    long_about = None
)]
struct Args {
    /// Real-world material files (flat records or saved SPARQL results)
    #[arg(short, long, required = true, num_args = 1..)]
    materials: Vec<PathBuf>,

    /// Directory holding the catalog JSON tree
    #[arg(short, long)]
    catalog_dir: PathBuf,

    /// Ledger output path
    #[arg(short, long, default_value = "ledger_materials.json")]
    output: PathBuf,

    /// JSON pipeline config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the match review threshold
    #[arg(long)]
    threshold: Option<f32>,

    /// Override the embedding dimension
    #[arg(long)]
    embedding_dim: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting matledger v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.match_threshold = threshold;
    }
    if let Some(dim) = args.embedding_dim {
        config.embedding_dim = dim;
    }
    info!("Match threshold: {}", config.match_threshold);
    info!("Embedding dimension: {}", config.embedding_dim);

    let materials = MaterialsLoader::load_all(&args.materials).context("loading materials")?;
    if materials.skipped > 0 {
        warn!("Skipped {} material records without an id", materials.skipped);
    }

    let catalog = CatalogLoader::new(&args.catalog_dir)
        .load()
        .with_context(|| format!("loading catalog from {}", args.catalog_dir.display()))?;
    if catalog.files_failed > 0 {
        warn!("{} catalog files could not be read", catalog.files_failed);
    }
    if catalog.skipped > 0 {
        warn!("Skipped {} catalog records without an id", catalog.skipped);
    }

    let pipeline = Pipeline::with_hashing_embedder(config)?;
    let output = pipeline.run(materials.records, catalog.records)?;

    let summary = LedgerExporter::new(&args.output).export(&output.ledger)?;

    let report = &output.report;
    info!(
        "Matched {} of {} materials ({} need review)",
        report.matches, report.materials, report.review_needed
    );
    info!(
        "Resolved {} of {} items, {} with properties, {} priced",
        report.items_resolved, report.items, report.items_with_properties, report.items_priced
    );
    info!(
        "Ledger written to {:?} ({} records, sha256 {})",
        summary.path, summary.records, summary.checksum
    );
    Ok(())
}
