// ============================================================
// Layer 4 — Block Reader (.docx)
// ============================================================
// Reads a .docx file with the docx-rs crate and yields its body as
// ContentBlocks, one per paragraph or table, in document order.
//
// The docx-rs tree walked here:
//   Docx
//     ├── document.children: Vec<DocumentChild>
//     │     ├── Paragraph → ParagraphChild::Run / Hyperlink / Insert
//     │     │                 └── RunChild::Text / Tab / Break / Drawing
//     │     └── Table → TableRow → TableCell → Paragraph
//     └── images: (rel id, media path, bytes, png) — reader only
//
// Drawings only carry the relationship id of their picture; the
// bytes are looked up in `docx.images` by that id, and the crop
// rectangle (which docx-rs drops) comes from data::crop_reader.

use std::{collections::HashMap, fs, path::{Path, PathBuf}};

use docx_rs::{
    read_docx, DocumentChild, DrawingData, InsertChild, Paragraph, ParagraphChild,
    Run, RunChild, Styles, Table, TableCellContent, TableChild, TableRowChild,
};

use crate::data::crop_reader::read_crops;
use crate::domain::block::{ContentBlock, CropRect, ImageBlob, TableBlock, TextBlock, TextRun};
use crate::domain::error::FormatError;
use crate::domain::traits::BlockSource;

/// Raw bytes and MIME type of one media part
#[derive(Debug, Clone)]
struct MediaPart {
    content_type: String,
    bytes:        Vec<u8>,
}

/// Lazy iterator over the blocks of one .docx document.
pub struct DocxBlockReader {
    path:     PathBuf,
    children: std::vec::IntoIter<DocumentChild>,
    media:    HashMap<String, MediaPart>,
    styles:   HashMap<String, String>,
    crops:    HashMap<String, CropRect>,
    index:    usize,
}

impl DocxBlockReader {
    /// Open and parse a .docx file. Any failure is a FormatError and
    /// no blocks are produced.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| FormatError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_bytes(path, &bytes)
    }

    /// Parse an in-memory .docx; `path` is only used for messages
    /// and source metadata.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, FormatError> {
        let path = path.into();
        let mut docx = read_docx(bytes).map_err(|e| FormatError::InvalidContainer {
            path:   path.clone(),
            reason: e.to_string(),
        })?;

        let media = docx
            .images
            .iter()
            .map(|(id, media_path, image, _png)| {
                let part = MediaPart {
                    content_type: content_type_for(media_path),
                    bytes:        image.0.clone(),
                };
                (id.clone(), part)
            })
            .collect::<HashMap<_, _>>();

        let styles = style_names(&docx.styles);
        let crops  = read_crops(bytes);
        let children = std::mem::take(&mut docx.document.children);
        tracing::debug!(
            "Opened '{}': {} body elements, {} media parts",
            path.display(),
            children.len(),
            media.len()
        );

        Ok(Self {
            path,
            children: children.into_iter(),
            media,
            styles,
            crops,
            index: 0,
        })
    }

    fn read_paragraph(&self, para: &Paragraph, index: usize) -> TextBlock {
        let mut runs   = Vec::new();
        let mut images = Vec::new();

        for child in &para.children {
            match child {
                ParagraphChild::Run(run) => self.read_run(run, &mut runs, &mut images),
                ParagraphChild::Hyperlink(link) => {
                    for c in &link.children {
                        if let ParagraphChild::Run(run) = c {
                            self.read_run(run, &mut runs, &mut images);
                        }
                    }
                }
                ParagraphChild::Insert(ins) => {
                    for c in &ins.children {
                        if let InsertChild::Run(run) = c {
                            self.read_run(run, &mut runs, &mut images);
                        }
                    }
                }
                _ => {}
            }
        }

        let mut block = TextBlock::from_runs(index, runs);
        block.style      = para.property.style.as_ref().map(|s| s.val.clone());
        block.style_name = block.style.as_ref().and_then(|id| self.styles.get(id).cloned());
        block.images = images;
        block
    }

    fn read_run(&self, run: &Run, runs: &mut Vec<TextRun>, images: &mut Vec<ImageBlob>) {
        let run_index = runs.len();
        let mut text  = String::new();
        let mut in_run = 0;

        for rc in &run.children {
            match rc {
                RunChild::Text(t)  => text.push_str(&t.text),
                RunChild::Tab(_)   => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                RunChild::Drawing(drawing) => {
                    if let Some(DrawingData::Pic(pic)) = &drawing.data {
                        if let Some(blob) = self.image_for(&pic.id, &pic.image, run_index, in_run) {
                            images.push(blob);
                            in_run += 1;
                        }
                    }
                }
                _ => {}
            }
        }

        runs.push(TextRun::new(text, is_underlined(run)));
    }

    fn image_for(
        &self,
        rel_id:       &str,
        inline_bytes: &[u8],
        run_index:    usize,
        index_in_run: usize,
    ) -> Option<ImageBlob> {
        let (content_type, bytes) = match self.media.get(rel_id) {
            Some(part) => (part.content_type.clone(), part.bytes.clone()),
            None if !inline_bytes.is_empty() => ("image/png".to_string(), inline_bytes.to_vec()),
            None => {
                tracing::warn!(
                    "'{}': drawing '{}' has no image data, ignored",
                    self.path.display(),
                    rel_id
                );
                return None;
            }
        };

        Some(ImageBlob {
            id: rel_id.to_string(),
            run_index,
            index_in_run,
            content_type,
            bytes,
            crop: self.crops.get(rel_id).copied(),
        })
    }

    fn read_table(&self, table: &Table, index: usize) -> TableBlock {
        let mut rows = Vec::new();

        for tc in &table.rows {
            #[allow(irrefutable_let_patterns)]
            let TableChild::TableRow(row) = tc else {
                continue;
            };
            let mut cells = Vec::new();
            for rc in &row.cells {
                #[allow(irrefutable_let_patterns)]
                let TableRowChild::TableCell(cell) = rc else {
                    continue;
                };
                let paragraphs: Vec<String> = cell
                    .children
                    .iter()
                    .filter_map(|cc| match cc {
                        TableCellContent::Paragraph(p) => Some(self.read_paragraph(p, index).text),
                        _ => None,
                    })
                    .collect();
                cells.push(paragraphs.join("\n").trim().to_string());
            }
            rows.push(cells);
        }

        TableBlock { index, rows }
    }
}

impl Iterator for DocxBlockReader {
    type Item = ContentBlock;

    fn next(&mut self) -> Option<ContentBlock> {
        loop {
            let child = self.children.next()?;
            let index = self.index;

            let block = match &child {
                DocumentChild::Paragraph(p) => ContentBlock::Text(self.read_paragraph(p, index)),
                DocumentChild::Table(t)     => ContentBlock::Table(self.read_table(t, index)),
                // bookmarks, section properties, structured tags
                _ => continue,
            };

            self.index += 1;
            return Some(block);
        }
    }
}

impl BlockSource for DocxBlockReader {
    fn document_path(&self) -> &Path {
        &self.path
    }
}

/// Style id → display name, read from the serde form of the style
/// table the same way underline values are.
fn style_names(styles: &Styles) -> HashMap<String, String> {
    let value = match serde_json::to_value(styles) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Could not read style table: {}", e);
            return HashMap::new();
        }
    };

    value
        .get("styles")
        .and_then(|v| v.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|st| {
                    let id   = st.get("styleId")?.as_str()?;
                    let name = st.get("name")?.as_str()?;
                    Some((id.to_string(), name.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A run counts as underlined when it has an underline property
/// whose value is anything but "none".
fn is_underlined(run: &Run) -> bool {
    run.run_property.underline.as_ref().map_or(false, |u| {
        serde_json::to_value(u)
            .ok()
            .and_then(|v| v.as_str().map(|s| s != "none"))
            .unwrap_or(true)
    })
}

/// MIME type from a media part path such as "media/image1.jpeg".
fn content_type_for(media_path: &str) -> String {
    let ext = Path::new(media_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        ""             => "application/octet-stream".to_string(),
        other          => format!("image/{other}"),
    }
}
