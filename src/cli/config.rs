//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::{AcquisitionConfig, HubConfig, MetadataFlush};
use anyhow::{Context, Result};

/// Convert CLI arguments to library configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `AcquisitionConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<AcquisitionConfig> {
        let metadata_flush = if cli.incremental_metadata {
            MetadataFlush::Incremental
        } else {
            MetadataFlush::AtEnd
        };

        AcquisitionConfig::builder()
            .root_dir(&cli.root)
            .dataset_id(&cli.dataset)
            .dataset_name(&cli.name)
            .split(&cli.split)
            .config_name(cli.config.clone())
            .image_format(cli.format)
            .jpeg_quality(cli.jpeg_quality)
            .progress_interval(cli.progress_interval)
            .metadata_flush(metadata_flush)
            .build()
            .context("Invalid acquisition settings")
    }

    /// Build `HubConfig` from CLI arguments and an optional token
    pub(crate) fn hub_from_cli(cli: &Cli, token: Option<String>) -> Result<HubConfig> {
        let hub = HubConfig {
            endpoint: cli.endpoint.clone(),
            page_size: cli.page_size,
            token,
            ..HubConfig::default()
        };
        hub.validate().context("Invalid hub endpoint settings")?;
        Ok(hub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::main_impl::tracing_config;
    use crate::config::ImageFormat;
    use crate::tracing_config::TracingFormat;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vqa-fetch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_reproduce_defaults() {
        let cli = parse(&[]);
        let config = CliConfigBuilder::from_cli(&cli).unwrap();

        assert_eq!(config, AcquisitionConfig::default());
        let hub = CliConfigBuilder::hub_from_cli(&cli, None).unwrap();
        assert_eq!(hub, HubConfig::default());
    }

    #[test]
    fn test_cli_config_conversion() {
        let cli = parse(&[
            "--root",
            "/srv/project",
            "--dataset",
            "org/other",
            "--name",
            "Other",
            "--split",
            "train",
            "--config",
            "default",
            "--format",
            "png",
            "--jpeg-quality",
            "90",
            "--progress-interval",
            "50",
            "--incremental-metadata",
        ]);
        let config = CliConfigBuilder::from_cli(&cli).unwrap();

        assert_eq!(config.root_dir, PathBuf::from("/srv/project"));
        assert_eq!(config.dataset_id, "org/other");
        assert_eq!(config.dataset_name, "Other");
        assert_eq!(config.split, "train");
        assert_eq!(config.config_name.as_deref(), Some("default"));
        assert_eq!(config.image_format, ImageFormat::Png);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.progress_interval, 50);
        assert_eq!(config.metadata_flush, MetadataFlush::Incremental);
    }

    #[test]
    fn test_cli_validation() {
        let cli = parse(&["--jpeg-quality", "0"]);
        assert!(CliConfigBuilder::from_cli(&cli).is_err());

        let cli = parse(&["--name", "../escape"]);
        assert!(CliConfigBuilder::from_cli(&cli).is_err());

        let cli = parse(&["--page-size", "500"]);
        assert!(CliConfigBuilder::hub_from_cli(&cli, None).is_err());
    }

    #[test]
    fn test_hub_token_passthrough() {
        let cli = parse(&["--endpoint", "http://localhost:8080"]);
        let hub = CliConfigBuilder::hub_from_cli(&cli, Some("hf_token".to_string())).unwrap();
        assert_eq!(hub.endpoint, "http://localhost:8080");
        assert_eq!(hub.token.as_deref(), Some("hf_token"));
    }

    #[test]
    fn test_format_accepts_extensions() {
        assert_eq!(parse(&["--format", "jpeg"]).format, ImageFormat::Jpeg);
        assert_eq!(parse(&["-f", "PNG"]).format, ImageFormat::Png);
        assert!(Cli::try_parse_from(["vqa-fetch", "--format", "gif"]).is_err());
    }

    #[test]
    fn test_log_format_selection() {
        let cli = parse(&[]);
        assert_eq!(cli.log_format, TracingFormat::Console);
        assert_eq!(tracing_config(&cli, None).format, TracingFormat::Console);

        let cli = parse(&["--log-format", "compact", "-v"]);
        let config = tracing_config(&cli, None);
        assert_eq!(config.format, TracingFormat::Compact);
        assert_eq!(config.filter_directive(), "debug");

        let cli = parse(&["--log-format", "json"]);
        assert_eq!(tracing_config(&cli, None).format, TracingFormat::Json);
    }

    #[test]
    fn test_rust_log_overrides_verbosity() {
        let cli = parse(&["-vv"]);
        let config = tracing_config(&cli, Some("vqa_fetch=info".to_string()));
        assert_eq!(config.filter_directive(), "vqa_fetch=info");
        assert!(config.session_id.is_some());
    }
}
