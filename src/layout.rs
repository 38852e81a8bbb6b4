//! On-disk layout of a materialized dataset
//!
//! ```text
//! <root>/data/raw/<dataset-name>/
//! ├── images/<img_id>.<ext>
//! └── metadata.csv
//! ```

use crate::error::{AcquireError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the image subdirectory inside the dataset root
pub const IMAGES_DIR_NAME: &str = "images";

/// Name of the metadata index inside the dataset root
pub const METADATA_FILE_NAME: &str = "metadata.csv";

/// Resolved output paths for one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    dataset_dir: PathBuf,
    images_dir: PathBuf,
    metadata_path: PathBuf,
}

impl DatasetLayout {
    /// Derive the layout for `dataset_name` under `root`
    #[must_use]
    pub fn new<P: AsRef<Path>>(root: P, dataset_name: &str) -> Self {
        let dataset_dir = root.as_ref().join("data").join("raw").join(dataset_name);
        let images_dir = dataset_dir.join(IMAGES_DIR_NAME);
        let metadata_path = dataset_dir.join(METADATA_FILE_NAME);

        Self {
            dataset_dir,
            images_dir,
            metadata_path,
        }
    }

    /// Create the dataset and image directories, including missing parents
    ///
    /// Safe to call when the directories already exist.
    ///
    /// # Errors
    /// - The filesystem denies directory creation
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dataset_dir).map_err(|e| {
            AcquireError::file_io_error("create dataset directory", &self.dataset_dir, &e)
        })?;
        fs::create_dir_all(&self.images_dir).map_err(|e| {
            AcquireError::file_io_error("create images directory", &self.images_dir, &e)
        })?;

        tracing::debug!(
            dataset_dir = %self.dataset_dir.display(),
            "Dataset directories ready"
        );
        Ok(())
    }

    #[must_use]
    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    #[must_use]
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// File name for an image: `<img_id>.<extension>`
    #[must_use]
    pub fn image_file_name(img_id: &str, extension: &str) -> String {
        format!("{img_id}.{extension}")
    }

    /// Absolute destination of an image
    #[must_use]
    pub fn image_path(&self, img_id: &str, extension: &str) -> PathBuf {
        self.images_dir
            .join(Self::image_file_name(img_id, extension))
    }

    /// Image path relative to the dataset root, always `/`-separated so the
    /// index reads the same on every platform
    #[must_use]
    pub fn relative_image_path(img_id: &str, extension: &str) -> String {
        format!("{IMAGES_DIR_NAME}/{}", Self::image_file_name(img_id, extension))
    }
}
