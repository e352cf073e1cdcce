// ============================================================
// Layer 3 — Content Block Domain Types
// ============================================================
// A .docx body is flattened into an ordered sequence of blocks:
//
//   ContentBlock
//     ├── Text(TextBlock)    one paragraph: runs, style, images
//     └── Table(TableBlock)  one table: rows of trimmed cell text
//
// Blocks are the atomic unit consumed by the question segmenter.
// They carry no docx-rs types so the segmenter can be tested
// with hand-built sequences.

use serde::{Deserialize, Serialize};

/// An image embedded in a run, extracted as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    /// Relationship id of the image part (e.g. "rId7")
    pub id: String,

    /// Position of the owning run inside its paragraph
    pub run_index: usize,

    /// Position of the image inside its run
    pub index_in_run: usize,

    /// MIME type, e.g. "image/png"
    pub content_type: String,

    pub bytes: Vec<u8>,

    /// Crop Word applies when displaying the picture
    pub crop: Option<CropRect>,
}

/// Word's `a:srcRect` crop: how much of each edge is hidden, in
/// 1/100000 of the image size. Negative values (padding) are
/// stored as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRect {
    pub left:   u32,
    pub top:    u32,
    pub right:  u32,
    pub bottom: u32,
}

impl CropRect {
    const FULL: u64 = 100_000;

    pub fn is_empty(&self) -> bool {
        *self == CropRect::default()
    }

    /// Pixel box `(x, y, width, height)` left after cropping a
    /// `width` × `height` image, or None when nothing would remain.
    pub fn pixel_box(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let part = |size: u32, edge: u32| (size as u64 * edge as u64 / Self::FULL) as u32;

        let x0 = part(width, self.left);
        let y0 = part(height, self.top);
        let x1 = width.saturating_sub(part(width, self.right));
        let y1 = height.saturating_sub(part(height, self.bottom));

        (x1 > x0 && y1 > y0).then(|| (x0, y0, x1 - x0, y1 - y0))
    }
}

impl ImageBlob {
    /// File extension used when the image is written out.
    /// Anything outside the common raster formats is stored as png.
    pub fn extension(&self) -> &str {
        let ext = self
            .content_type
            .rsplit('/')
            .next()
            .unwrap_or("png");

        match ext.to_ascii_lowercase().as_str() {
            "png"  => "png",
            "jpeg" => "jpeg",
            "jpg"  => "jpg",
            "gif"  => "gif",
            "bmp"  => "bmp",
            "webp" => "webp",
            _      => "png",
        }
    }
}

/// One contiguous run of text with its underline flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub text:       String,
    pub underlined: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, underlined: bool) -> Self {
        Self { text: text.into(), underlined }
    }
}

/// A paragraph-like block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    /// Position of the block in the document body
    pub index: usize,

    /// Concatenated text of all runs
    pub text: String,

    /// Paragraph style id, e.g. "Heading1"
    pub style: Option<String>,

    /// Display name of that style, e.g. "heading 1". Localized Word
    /// keeps this name while the id changes.
    pub style_name: Option<String>,

    /// Every run of the paragraph, including image-only runs
    pub runs: Vec<TextRun>,

    pub images: Vec<ImageBlob>,
}

impl TextBlock {
    /// Build a block from runs; the block text is the runs joined.
    pub fn from_runs(index: usize, runs: Vec<TextRun>) -> Self {
        let text = runs.iter().map(|r| r.text.as_str()).collect();
        Self { index, text, style: None, style_name: None, runs, images: Vec::new() }
    }

    /// Convenience constructor for a single plain run.
    pub fn plain(index: usize, text: impl Into<String>) -> Self {
        Self::from_runs(index, vec![TextRun::new(text, false)])
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_image(mut self, image: ImageBlob) -> Self {
        self.images.push(image);
        self
    }

    /// True when the style name, or failing that the style id,
    /// starts with "heading", case-insensitively.
    pub fn is_heading(&self) -> bool {
        [self.style_name.as_deref(), self.style.as_deref()]
            .into_iter()
            .flatten()
            .any(|s| s.to_lowercase().starts_with("heading"))
    }

    /// True when any run carrying visible text is underlined.
    pub fn has_underlined_text(&self) -> bool {
        self.runs
            .iter()
            .any(|r| r.underlined && !r.text.trim().is_empty())
    }
}

/// A table block: rows of cell strings, first row undistinguished.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableBlock {
    pub index: usize,
    pub rows:  Vec<Vec<String>>,
}

/// A table as stored in a question record: the first row becomes
/// `headers`, the remaining rows stay in `rows`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub headers: Vec<String>,

    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl From<&TableBlock> for TableData {
    fn from(block: &TableBlock) -> Self {
        let mut rows = block
            .rows
            .iter()
            .map(|r| r.iter().map(|c| c.trim().to_string()).collect::<Vec<_>>());

        let headers = rows.next().unwrap_or_default();
        Self { headers, rows: rows.collect() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(TextBlock),
    Table(TableBlock),
}

impl ContentBlock {
    pub fn index(&self) -> usize {
        match self {
            ContentBlock::Text(t)  => t.index,
            ContentBlock::Table(t) => t.index,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_data_splits_first_row() {
        let block = TableBlock {
            index: 0,
            rows:  vec![
                vec![" x ".into(), "y".into()],
                vec!["1".into(), " 2".into()],
            ],
        };
        let t = TableData::from(&block);
        assert_eq!(t.headers, vec!["x", "y"]);
        assert_eq!(t.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_empty_table() {
        let t = TableData::from(&TableBlock::default());
        assert!(t.headers.is_empty());
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_underline_ignores_blank_runs() {
        let block = TextBlock::from_runs(0, vec![
            TextRun::new("A. ", false),
            TextRun::new("   ", true),
        ]);
        assert!(!block.has_underlined_text());
        assert_eq!(block.text, "A.    ");
    }

    #[test]
    fn test_heading_detection() {
        assert!(TextBlock::plain(0, "Chương 1").with_style("Heading1").is_heading());
        assert!(!TextBlock::plain(0, "x").with_style("Normal").is_heading());
        assert!(!TextBlock::plain(0, "x").is_heading());

        let mut localized = TextBlock::plain(0, "Chương 2").with_style("u1");
        assert!(!localized.is_heading());
        localized.style_name = Some("heading 1".into());
        assert!(localized.is_heading());
    }

    #[test]
    fn test_crop_pixel_box() {
        let crop = CropRect { left: 25_000, top: 0, right: 25_000, bottom: 50_000 };
        assert_eq!(crop.pixel_box(100, 40), Some((25, 0, 50, 20)));
        assert!(!crop.is_empty());

        let all = CropRect { left: 60_000, top: 0, right: 60_000, bottom: 0 };
        assert_eq!(all.pixel_box(100, 40), None);
        assert_eq!(CropRect::default().pixel_box(7, 3), Some((0, 0, 7, 3)));
    }

    #[test]
    fn test_image_extension_fallback() {
        let mut img = ImageBlob {
            id:           "rId1".into(),
            run_index:    0,
            index_in_run: 0,
            content_type: "image/jpeg".into(),
            bytes:        vec![],
            crop:         None,
        };
        assert_eq!(img.extension(), "jpeg");
        img.content_type = "image/x-emf".into();
        assert_eq!(img.extension(), "png");
    }
}
