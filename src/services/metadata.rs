//! Metadata index accumulation and serialization

use crate::{
    error::{AcquireError, Result},
    record::{MetadataRow, Record},
};
use std::fs::File;
use std::path::{Path, PathBuf};

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    let file = File::create(path)
        .map_err(|e| AcquireError::file_io_error("create metadata file", path, &e))?;

    // The header is written by hand so that an empty table still gets one
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file))
}

/// In-memory metadata table, flushed to disk once
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the row for `record`, whose image lives at `image_filepath`
    /// (relative to the dataset root)
    pub fn push(&mut self, record: &Record, image_filepath: String) {
        self.push_row(record.to_metadata_row(image_filepath));
    }

    /// Append an already projected row
    pub fn push_row(&mut self, row: MetadataRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order
    #[must_use]
    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    /// Write the header and every row to `path`, replacing any existing file
    ///
    /// # Errors
    /// - The file cannot be created or written
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let mut writer = csv_writer(path_ref)?;

        writer.write_record(MetadataRow::HEADER)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer
            .flush()
            .map_err(|e| AcquireError::file_io_error("flush metadata file", path_ref, &e))?;

        tracing::debug!(
            path = %path_ref.display(),
            rows = self.rows.len(),
            "Metadata written"
        );
        Ok(())
    }

    /// Read a metadata file back into a table
    ///
    /// # Errors
    /// - The file cannot be read
    /// - A row does not have the expected columns
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .map_err(|e| AcquireError::file_io_error("open metadata file", path_ref, &e))?;

        let mut reader = csv::Reader::from_reader(file);
        let rows = reader
            .deserialize::<MetadataRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }
}

/// Metadata file that is appended and flushed row by row
///
/// The header is written on creation, so the file is valid after every
/// append even if the run stops.
pub struct IncrementalMetadataWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl IncrementalMetadataWriter {
    /// Create (or truncate) the metadata file and write the header
    ///
    /// # Errors
    /// - The file cannot be created or written
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv_writer(&path)?;

        writer.write_record(MetadataRow::HEADER)?;
        writer
            .flush()
            .map_err(|e| AcquireError::file_io_error("flush metadata file", &path, &e))?;

        Ok(Self {
            path,
            writer,
            rows: 0,
        })
    }

    /// Append one row and flush it to disk
    ///
    /// # Errors
    /// - The row cannot be written
    pub fn append(&mut self, row: &MetadataRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.writer
            .flush()
            .map_err(|e| AcquireError::file_io_error("flush metadata file", &self.path, &e))?;
        self.rows += 1;
        Ok(())
    }

    /// Rows appended so far
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
