//! Image I/O operations service
//!
//! This module separates image persistence from the acquisition loop,
//! making the loop testable without touching encoders.

use crate::{
    config::ImageFormat,
    error::{AcquireError, Result},
};
use image::{codecs::jpeg::JpegEncoder, codecs::png::PngEncoder, DynamicImage, ImageEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encodes decoded images and writes them to disk
#[derive(Debug, Clone, Copy)]
pub struct ImageWriter {
    format: ImageFormat,
    jpeg_quality: u8,
}

impl ImageWriter {
    /// Create a writer for the given format
    ///
    /// `jpeg_quality` is only consulted for JPEG output.
    #[must_use]
    pub fn new(format: ImageFormat, jpeg_quality: u8) -> Self {
        Self {
            format,
            jpeg_quality,
        }
    }

    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Extension (without the dot) of files produced by this writer
    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Encode `image` and write it to `path`, replacing any existing file
    ///
    /// # Examples
    /// ```rust,no_run
    /// use vqa_fetch::{config::ImageFormat, services::ImageWriter};
    /// use image::DynamicImage;
    ///
    /// # let image = DynamicImage::new_rgb8(100, 100);
    /// ImageWriter::new(ImageFormat::Jpeg, 75).save(&image, "images/a1.jpg")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// - The file cannot be created or written
    /// - The encoder rejects the image
    pub fn save<P: AsRef<Path>>(&self, image: &DynamicImage, path: P) -> Result<()> {
        let path_ref = path.as_ref();

        let file = File::create(path_ref)
            .map_err(|e| AcquireError::file_io_error("create image file", path_ref, &e))?;
        let mut writer = BufWriter::new(file);

        self.encode(image, &mut writer)
            .map_err(|e| AcquireError::image_save_error(path_ref, &e))?;

        writer
            .flush()
            .map_err(|e| AcquireError::file_io_error("flush image file", path_ref, &e))?;

        tracing::trace!(
            path = %path_ref.display(),
            width = image.width(),
            height = image.height(),
            format = %self.format,
            "Image written"
        );
        Ok(())
    }

    /// Encode `image` into any writer
    fn encode<W: Write>(&self, image: &DynamicImage, writer: W) -> image::ImageResult<()> {
        match self.format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = image.to_rgb8();
                JpegEncoder::new_with_quality(writer, self.jpeg_quality).write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
            },
            ImageFormat::Png => {
                let rgba = image.to_rgba8();
                PngEncoder::new(writer).write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    image::ExtendedColorType::Rgba8,
                )
            },
            #[cfg(feature = "webp-support")]
            ImageFormat::WebP => {
                let rgba = image.to_rgba8();
                image::codecs::webp::WebPEncoder::new_lossless(writer).write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    image::ExtendedColorType::Rgba8,
                )
            },
        }
    }
}
