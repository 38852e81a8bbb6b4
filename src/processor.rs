//! Acquisition processor
//!
//! Drives one run end to end: prepare the layout, stream records from a
//! [`DatasetSource`], write each image, collect its metadata row, and write
//! the metadata index. Records are handled strictly one at a time, in
//! source order.

use crate::{
    config::{AcquisitionConfig, MetadataFlush},
    error::Result,
    layout::DatasetLayout,
    services::{
        IncrementalMetadataWriter, ImageWriter, LogProgressReporter, MetadataTable,
        ProgressReporter,
    },
    source::DatasetSource,
    tracing_config::spans,
};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionSummary {
    /// Records processed (images written, rows in the metadata file)
    pub records: u64,
    pub dataset_dir: PathBuf,
    pub images_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Runs acquisitions for one configuration
pub struct AcquisitionProcessor {
    config: AcquisitionConfig,
    layout: DatasetLayout,
    writer: ImageWriter,
    progress: Box<dyn ProgressReporter>,
}

impl AcquisitionProcessor {
    /// Create a processor, logging progress every `progress_interval` records
    ///
    /// # Errors
    /// - Invalid configuration
    pub fn new(config: AcquisitionConfig) -> Result<Self> {
        let progress = Box::new(LogProgressReporter::new(config.progress_interval));
        Self::with_progress(config, progress)
    }

    /// Create a processor with a custom progress reporter
    ///
    /// # Errors
    /// - Invalid configuration
    pub fn with_progress(
        config: AcquisitionConfig,
        progress: Box<dyn ProgressReporter>,
    ) -> Result<Self> {
        config.validate()?;

        let layout = DatasetLayout::new(&config.root_dir, &config.dataset_name);
        let writer = ImageWriter::new(config.image_format, config.jpeg_quality);

        Ok(Self {
            config,
            layout,
            writer,
            progress,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Materialize every record of `source`
    ///
    /// Any error aborts the run. Images already written stay on disk; with
    /// [`MetadataFlush::AtEnd`] no metadata file is written, with
    /// [`MetadataFlush::Incremental`] the file lists the images written so far.
    ///
    /// # Errors
    /// - Directory creation or file writes fail
    /// - The source fails to open or yields an error
    /// - An image cannot be encoded
    pub async fn run(&self, source: &dyn DatasetSource) -> Result<AcquisitionSummary> {
        let span = spans::acquisition(&source.describe(), &self.config.dataset_name);
        self.run_inner(source).instrument(span).await
    }

    async fn run_inner(&self, source: &dyn DatasetSource) -> Result<AcquisitionSummary> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        self.layout.prepare()?;
        tracing::info!(
            "Downloading and preparing {} to: {}",
            source.describe(),
            self.layout.dataset_dir().display()
        );

        let mut incremental = match self.config.metadata_flush {
            MetadataFlush::Incremental => {
                Some(IncrementalMetadataWriter::create(self.layout.metadata_path())?)
            },
            MetadataFlush::AtEnd => None,
        };

        let mut table = MetadataTable::new();
        let mut records = source.open().await?;
        let extension = self.writer.extension();

        while let Some(record) = records.try_next().await? {
            let row = spans::record(&record.img_id).in_scope(|| -> Result<_> {
                let image_path = self.layout.image_path(&record.img_id, extension);
                self.writer.save(&record.image, &image_path)?;

                let row = record
                    .to_metadata_row(DatasetLayout::relative_image_path(&record.img_id, extension));
                if let Some(writer) = incremental.as_mut() {
                    writer.append(&row)?;
                }
                Ok(row)
            })?;
            table.push_row(row);

            tracing::debug!(img_id = %record.img_id, "Record materialized");
            self.progress.report_processed(table.len() as u64);
        }

        if incremental.is_none() {
            table.write_csv(self.layout.metadata_path())?;
        }

        let summary = AcquisitionSummary {
            records: table.len() as u64,
            dataset_dir: self.layout.dataset_dir().to_path_buf(),
            images_dir: self.layout.images_dir().to_path_buf(),
            metadata_path: self.layout.metadata_path().to_path_buf(),
            started_at,
            elapsed: start_time.elapsed(),
        };

        self.progress.report_completion(&summary);
        Ok(summary)
    }
}
