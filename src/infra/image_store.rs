// ============================================================
// Layer 6 — Directory Image Sink
// ============================================================
// Writes images extracted by the segmenter into one directory:
//
//   <output>/<image_dir>/<qid>_<part>_<block>_<run>_<img>.<ext>
//
// Each image is decoded, cropped to the rectangle Word displays,
// and re-encoded in the format its extension names. When that
// fails (an ImageExtractionError) the original bytes are written
// unchanged. The reference handed back is the written path with
// "/" separators on every platform.

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use image::{ImageFormat, ImageOutputFormat};

use crate::domain::block::ImageBlob;
use crate::domain::error::ImageExtractionError;
use crate::domain::traits::{ImageSink, ImageSlot};

pub struct DirImageSink {
    dir:     PathBuf,
    written: usize,
}

impl DirImageSink {
    /// Sink writing into `dir`; the directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), written: 0 }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of images written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ImageSink for DirImageSink {
    fn store(&mut self, image: &ImageBlob, slot: &ImageSlot<'_>) -> Option<String> {
        let name = slot.file_name(image);
        let path = self.dir.join(&name);

        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!("Cannot create image directory '{}': {}", self.dir.display(), e);
            return None;
        }

        let bytes = match reencode(image, &name) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!("{}; storing raw bytes", err);
                image.bytes.clone()
            }
        };

        if let Err(e) = fs::write(&path, bytes) {
            tracing::warn!("Cannot write image '{}': {}", path.display(), e);
            return None;
        }

        self.written += 1;
        tracing::debug!("Stored image '{}'", path.display());
        Some(path.to_string_lossy().replace('\\', "/"))
    }
}

fn reencode(image: &ImageBlob, name: &str) -> Result<Vec<u8>, ImageExtractionError> {
    let decoded = image::load_from_memory(&image.bytes).map_err(|e| ImageExtractionError::Decode {
        name:   name.to_string(),
        reason: e.to_string(),
    })?;

    let decoded = match image.crop {
        Some(crop) if !crop.is_empty() => match crop.pixel_box(decoded.width(), decoded.height()) {
            Some((x, y, w, h)) => decoded.crop_imm(x, y, w, h),
            None => {
                tracing::warn!("Crop of '{}' leaves no pixels, kept uncropped", name);
                decoded
            }
        },
        _ => decoded,
    };

    let format = ImageFormat::from_extension(image.extension())
        .map(ImageOutputFormat::from)
        .unwrap_or(ImageOutputFormat::Png);

    let mut buf = Cursor::new(Vec::new());
    decoded
        .write_to(&mut buf, format)
        .map_err(|e| ImageExtractionError::Encode {
            name:   name.to_string(),
            reason: e.to_string(),
        })?;

    Ok(buf.into_inner())
}
