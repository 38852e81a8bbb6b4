//! Dataset records and their metadata projection

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// One dataset entry: an image plus its question-answer annotation
#[derive(Debug, Clone)]
pub struct Record {
    /// Decoded raster image
    pub image: DynamicImage,
    /// Origin of the image (e.g. `hyperkvasir`)
    pub source: String,
    pub question: String,
    pub answer: String,
    /// Image identifier, used as the file stem
    pub img_id: String,
}

impl Record {
    /// Project the record onto a metadata row, dropping the image
    #[must_use]
    pub fn to_metadata_row(&self, image_filepath: String) -> MetadataRow {
        MetadataRow {
            source: self.source.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
            img_id: self.img_id.clone(),
            image_filepath,
        }
    }
}

/// A record without its image, plus the image path relative to the dataset root
///
/// Field order is the column order of the metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub source: String,
    pub question: String,
    pub answer: String,
    pub img_id: String,
    pub image_filepath: String,
}

impl MetadataRow {
    /// Column names, in file order
    pub const HEADER: [&'static str; 5] =
        ["source", "question", "answer", "img_id", "image_filepath"];
}
