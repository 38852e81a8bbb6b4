//! Configuration types for dataset acquisition

use crate::error::{AcquireError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default dataset repository on the hub
pub const DEFAULT_DATASET_ID: &str = "SimulaMet-HOST/Kvasir-VQA";

/// Default local directory name for the dataset
pub const DEFAULT_DATASET_NAME: &str = "Kvasir-VQA";

/// Default split to materialize
pub const DEFAULT_SPLIT: &str = "raw";

/// Default JPEG quality, matching the usual encoder default
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Default number of records between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1000;

/// Output image format; also fixes the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossy JPEG, alpha channel dropped
    Jpeg,
    /// Lossless PNG
    Png,
    /// Lossless WebP
    #[cfg(feature = "webp-support")]
    WebP,
}

impl Default for ImageFormat {
    fn default() -> Self {
        Self::Jpeg
    }
}

impl ImageFormat {
    /// File extension written for this format (without the dot)
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            #[cfg(feature = "webp-support")]
            Self::WebP => "webp",
        }
    }

    /// Resolve a format from a file extension (case-insensitive, dot optional)
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            #[cfg(feature = "webp-support")]
            "webp" => Ok(Self::WebP),
            other => Err(AcquireError::invalid_config(format!(
                "Unsupported image extension: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            #[cfg(feature = "webp-support")]
            Self::WebP => write!(f, "webp"),
        }
    }
}

/// When the metadata file is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataFlush {
    /// Hold every row in memory and write the file once, after the last record.
    /// A failed run leaves images on disk and no metadata file.
    #[default]
    AtEnd,
    /// Write the header up front and append each row right after its image.
    /// A failed run leaves a metadata file listing exactly the written images.
    Incremental,
}

/// Configuration for one acquisition run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Project root; output goes under `<root>/data/raw/<dataset_name>`
    pub root_dir: PathBuf,

    /// Dataset repository id on the remote source
    pub dataset_id: String,

    /// Local directory name for the dataset
    pub dataset_name: String,

    /// Split (partition) to fetch
    pub split: String,

    /// Dataset configuration owning the split (`None` = resolve from the source)
    pub config_name: Option<String>,

    /// Output image format
    pub image_format: ImageFormat,

    /// JPEG quality (1-100, only used for JPEG output)
    pub jpeg_quality: u8,

    /// Records between progress reports
    pub progress_interval: u64,

    /// Metadata persistence strategy
    pub metadata_flush: MetadataFlush,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            split: DEFAULT_SPLIT.to_string(),
            config_name: None,
            image_format: ImageFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            metadata_flush: MetadataFlush::default(),
        }
    }
}

impl AcquisitionConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> AcquisitionConfigBuilder {
        AcquisitionConfigBuilder::new()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.dataset_id.trim().is_empty() {
            return Err(AcquireError::invalid_config("Dataset id cannot be empty"));
        }

        if self.split.trim().is_empty() {
            return Err(AcquireError::invalid_config("Split name cannot be empty"));
        }

        validate_dataset_name(&self.dataset_name)?;

        if let Some(config_name) = &self.config_name {
            if config_name.trim().is_empty() {
                return Err(AcquireError::invalid_config(
                    "Dataset configuration name cannot be empty when set",
                ));
            }
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AcquireError::invalid_config(format!(
                "Invalid JPEG quality: {} (valid range: 1-100). Recommended: {}",
                self.jpeg_quality, DEFAULT_JPEG_QUALITY
            )));
        }

        if self.progress_interval == 0 {
            return Err(AcquireError::invalid_config(
                "Progress interval must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Default datasets-server endpoint
pub const DEFAULT_HUB_ENDPOINT: &str = "https://datasets-server.huggingface.co";

/// Largest page the datasets-server hands out
pub const MAX_PAGE_SIZE: u32 = 100;

/// Connection settings for the remote dataset hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the datasets-server API
    pub endpoint: String,

    /// Rows requested per page (1-100)
    pub page_size: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Optional bearer token for gated or private datasets
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout_secs: 300, // 5 minute timeout
            token: None,
        }
    }
}

impl HubConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.endpoint).map_err(|e| {
            AcquireError::invalid_config(format!("Invalid hub endpoint '{}': {e}", self.endpoint))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AcquireError::invalid_config(format!(
                "Unsupported hub endpoint scheme: {}",
                endpoint.scheme()
            )));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AcquireError::invalid_config(format!(
                "Invalid page size: {} (valid range: 1-{MAX_PAGE_SIZE})",
                self.page_size
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AcquireError::invalid_config(
                "Request timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// The dataset name becomes a single directory component
fn validate_dataset_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AcquireError::invalid_config("Dataset name cannot be empty"));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(AcquireError::invalid_config(format!(
            "Dataset name must be a single directory name, got '{name}'"
        )));
    }

    Ok(())
}

/// Builder for `AcquisitionConfig`
#[derive(Debug, Default)]
pub struct AcquisitionConfigBuilder {
    config: AcquisitionConfig,
}

impl AcquisitionConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root_dir<P: Into<PathBuf>>(mut self, root_dir: P) -> Self {
        self.config.root_dir = root_dir.into();
        self
    }

    #[must_use]
    pub fn dataset_id<S: Into<String>>(mut self, dataset_id: S) -> Self {
        self.config.dataset_id = dataset_id.into();
        self
    }

    #[must_use]
    pub fn dataset_name<S: Into<String>>(mut self, dataset_name: S) -> Self {
        self.config.dataset_name = dataset_name.into();
        self
    }

    #[must_use]
    pub fn split<S: Into<String>>(mut self, split: S) -> Self {
        self.config.split = split.into();
        self
    }

    #[must_use]
    pub fn config_name(mut self, config_name: Option<String>) -> Self {
        self.config.config_name = config_name;
        self
    }

    #[must_use]
    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.config.image_format = format;
        self
    }

    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    #[must_use]
    pub fn progress_interval(mut self, interval: u64) -> Self {
        self.config.progress_interval = interval;
        self
    }

    #[must_use]
    pub fn metadata_flush(mut self, flush: MetadataFlush) -> Self {
        self.config.metadata_flush = flush;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Invalid parameter values (see [`AcquisitionConfig::validate`])
    pub fn build(self) -> Result<AcquisitionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
