// ============================================================
// Layer 3 — Core Traits (Seams)
// ============================================================
// The segmenter never touches the filesystem. It reads blocks from
// a BlockSource and hands images to an ImageSink, both injected by
// the caller:
//
//   DocxBlockReader  → BlockSource   (data/block_reader.rs)
//   DirImageSink     → ImageSink     (infra/image_store.rs)

use std::path::Path;

use crate::domain::block::{ContentBlock, ImageBlob};

// ─── BlockSource ──────────────────────────────────────────────────────────────
/// A lazy, finite, non-restartable sequence of blocks in document order.
pub trait BlockSource: Iterator<Item = ContentBlock> {
    /// Path of the document the blocks come from
    fn document_path(&self) -> &Path;
}

// ─── ImageSink ────────────────────────────────────────────────────────────────
/// Naming context for one stored image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot<'a> {
    /// Id of the question the image belongs to
    pub question_id: &'a str,

    /// "content", "explanation" or "optA".."optD"
    pub part: &'a str,

    /// Index of the block the image was found in
    pub block_index: usize,
}

impl ImageSlot<'_> {
    /// "{qid}_{part}_{block}_{run}_{img}.{ext}"
    pub fn file_name(&self, image: &ImageBlob) -> String {
        format!(
            "{}_{}_{}_{}_{}.{}",
            self.question_id,
            self.part,
            self.block_index,
            image.run_index,
            image.index_in_run,
            image.extension(),
        )
    }
}

/// Anything that can persist an extracted image and return a
/// reference string for it (a path or URL).
pub trait ImageSink {
    /// Returns None only when the image could not be stored at all.
    fn store(&mut self, image: &ImageBlob, slot: &ImageSlot<'_>) -> Option<String>;
}

/// Sink that stores nothing and records references in memory.
/// Useful when only the text structure of a document is wanted.
#[derive(Debug, Default)]
pub struct MemoryImageSink {
    pub stored: Vec<(String, Vec<u8>)>,
}

impl ImageSink for MemoryImageSink {
    fn store(&mut self, image: &ImageBlob, slot: &ImageSlot<'_>) -> Option<String> {
        let name = slot.file_name(image);
        self.stored.push((name.clone(), image.bytes.clone()));
        Some(name)
    }
}
