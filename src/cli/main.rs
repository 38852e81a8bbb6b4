//! Dataset acquisition CLI
//!
//! Without arguments this fetches `SimulaMet-HOST/Kvasir-VQA` (split `raw`)
//! into `./data/raw/Kvasir-VQA/`.

use super::config::CliConfigBuilder;
use crate::{
    config::ImageFormat,
    processor::AcquisitionProcessor,
    services::create_cli_progress_reporter,
    source::HubDatasetSource,
    tracing_config::{TracingConfig, TracingFormat},
    DatasetSource,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

/// Environment variable holding an optional hub access token
pub const TOKEN_ENV_VAR: &str = "HF_TOKEN";

/// Download an image question-answer dataset into local images and a CSV index
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "vqa-fetch")]
pub struct Cli {
    /// Project root; output goes to <ROOT>/data/raw/<NAME>
    #[arg(long, value_name = "ROOT", default_value = ".")]
    pub root: String,

    /// Dataset repository id on the hub
    #[arg(long, default_value = crate::config::DEFAULT_DATASET_ID)]
    pub dataset: String,

    /// Local directory name for the dataset
    #[arg(long, default_value = crate::config::DEFAULT_DATASET_NAME)]
    pub name: String,

    /// Split to fetch
    #[arg(long, default_value = crate::config::DEFAULT_SPLIT)]
    pub split: String,

    /// Dataset configuration owning the split [default: resolved from the hub]
    #[arg(long)]
    pub config: Option<String>,

    /// Output image format, given as its extension: jpg, jpeg, png (webp with webp-support)
    #[arg(short, long, value_parser = parse_image_format, default_value = "jpg")]
    pub format: ImageFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = crate::config::DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,

    /// Records between progress log lines
    #[arg(long, default_value_t = crate::config::DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,

    /// Append each metadata row as soon as its image is written
    #[arg(long)]
    pub incremental_metadata: bool,

    /// datasets-server endpoint
    #[arg(long, default_value = crate::config::DEFAULT_HUB_ENDPOINT)]
    pub endpoint: String,

    /// Rows requested per page (1-100)
    #[arg(long, default_value_t = crate::config::MAX_PAGE_SIZE)]
    pub page_size: u32,

    /// Show a live record counter instead of periodic log lines
    #[arg(long)]
    pub progress: bool,

    /// Log line layout
    #[arg(long, value_enum, default_value_t = TracingFormat::Console)]
    pub log_format: TracingFormat,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_image_format(value: &str) -> std::result::Result<ImageFormat, String> {
    ImageFormat::from_extension(value).map_err(|e| e.to_string())
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli).context("Failed to initialize tracing")?;

    let config = CliConfigBuilder::from_cli(&cli).context("Invalid configuration")?;
    let token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());
    let hub = CliConfigBuilder::hub_from_cli(&cli, token).context("Invalid hub settings")?;
    debug!(?config, endpoint = %hub.endpoint, "Configuration resolved");

    let source = HubDatasetSource::from_config(&hub, &config)
        .context("Failed to create dataset source")?;
    info!("Source: {}", source.describe());

    let reporter = create_cli_progress_reporter(cli.progress, config.progress_interval);
    let processor = AcquisitionProcessor::with_progress(config, reporter)
        .context("Failed to create acquisition processor")?;

    let summary = processor
        .run(&source)
        .await
        .with_context(|| format!("Failed to acquire {}", source.describe()))?;

    println!();
    println!(
        "✅ Dataset downloaded and processed to: {}",
        summary.dataset_dir.display()
    );
    println!("   Total images saved: {}", summary.records);
    println!("   Metadata saved to: {}", summary.metadata_path.display());
    println!("   Elapsed: {:.2}s", summary.elapsed.as_secs_f64());

    Ok(())
}

/// Subscriber settings from `-v`, `--log-format` and `RUST_LOG`
pub(crate) fn tracing_config(cli: &Cli, rust_log: Option<String>) -> TracingConfig {
    let config = TracingConfig::new()
        .with_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_session_id(uuid::Uuid::new_v4().to_string());

    // RUST_LOG wins over -v
    match rust_log {
        Some(filter) => config.with_env_filter(filter),
        None => config,
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok().filter(|f| !f.is_empty());
    tracing_config(cli, rust_log)
        .init()
        .context("Failed to initialize tracing subscriber")
}
