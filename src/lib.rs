#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # vqa-fetch
//!
//! Materializes a remote image question-answer dataset on local disk: every
//! image becomes a file under `data/raw/<dataset>/images/`, and the text
//! fields of every record land in `data/raw/<dataset>/metadata.csv`.
//!
//! ## Features
//!
//! - **Hub source**: pages through the Hugging Face datasets-server and
//!   downloads each image (`SimulaMet-HOST/Kvasir-VQA`, split `raw` by default)
//! - **Injectable sources**: anything implementing [`DatasetSource`], including
//!   [`InMemorySource`] for synthetic records
//! - **Image output**: JPEG (default), PNG, WebP (`webp-support` feature)
//! - **Metadata flushing**: once at the end (default) or row by row
//! - **CLI**: `vqa-fetch` binary (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vqa_fetch::{AcquisitionConfig, AcquisitionProcessor, HubConfig, HubDatasetSource};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AcquisitionConfig::builder().root_dir("/srv/project").build()?;
//! let source = HubDatasetSource::from_config(&HubConfig::default(), &config)?;
//!
//! let summary = AcquisitionProcessor::new(config)?.run(&source).await?;
//! println!("{} images saved to {}", summary.records, summary.images_dir.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Synthetic records
//!
//! ```rust,no_run
//! use vqa_fetch::{AcquisitionConfig, AcquisitionProcessor, InMemorySource, Record};
//! use image::DynamicImage;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = InMemorySource::new(vec![Record {
//!     image: DynamicImage::new_rgb8(64, 64),
//!     source: "S".to_string(),
//!     question: "Q1".to_string(),
//!     answer: "A1".to_string(),
//!     img_id: "a1".to_string(),
//! }]);
//!
//! let config = AcquisitionConfig::builder().root_dir("/tmp/out").build()?;
//! AcquisitionProcessor::new(config)?.run(&source).await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod processor;
pub mod record;
pub mod services;
pub mod source;
pub mod tracing_config;

pub use config::{AcquisitionConfig, AcquisitionConfigBuilder, HubConfig, ImageFormat, MetadataFlush};
pub use error::{AcquireError, Result};
pub use layout::DatasetLayout;
pub use processor::{AcquisitionProcessor, AcquisitionSummary};
pub use record::{MetadataRow, Record};
pub use services::{ImageWriter, MetadataTable, ProgressReporter};
pub use source::{DatasetSource, HubDatasetSource, InMemorySource, RecordStream};
pub use tracing_config::{TracingConfig, TracingFormat};
