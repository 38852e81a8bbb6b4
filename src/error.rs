//! Error types for dataset acquisition

use std::path::Path;
use thiserror::Error;

/// Result type alias for acquisition operations
pub type Result<T> = std::result::Result<T, AcquireError>;

/// Every way an acquisition run can fail. All of them abort the run.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// Input/output errors (permission denied, disk full, invalid path)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Metadata serialization errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Transport or remote-service errors
    #[error("Network error: {context}: {source}")]
    Network {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The remote source does not know the requested dataset or split
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// A record is missing a field or carries an undecodable image
    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: u64, reason: String },
}

impl AcquireError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new dataset-not-found error
    pub fn dataset_not_found<S: Into<String>>(msg: S) -> Self {
        Self::DatasetNotFound(msg.into())
    }

    /// Create a malformed record error for the given row index
    pub fn malformed_record<S: Into<String>>(row: u64, reason: S) -> Self {
        Self::MalformedRecord {
            row,
            reason: reason.into(),
        }
    }

    /// Create a network error with request context
    pub fn network_error<S, E>(context: S, error: E) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Network {
            context: context.into(),
            source: error.into(),
        }
    }

    /// Create a network error for a non-success HTTP status
    pub fn http_status(status: reqwest::StatusCode, url: &str) -> Self {
        Self::network_error(
            format!("HTTP error {status} for {url}"),
            std::io::Error::new(std::io::ErrorKind::Other, "unexpected response status"),
        )
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, error: &std::io::Error) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {operation} '{path_display}': {error}"),
        ))
    }

    /// Create image save error with destination context
    pub fn image_save_error<P: AsRef<Path>>(path: P, error: &image::ImageError) -> Self {
        let path_display = path.as_ref().display();
        Self::Image(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to save image '{path_display}': {error}"),
        )))
    }
}
