// ============================================================
// Layer 4 — Picture Crop Reader
// ============================================================
// docx-rs does not keep the `a:srcRect` of a picture, so the crop
// rectangles are read straight from word/document.xml:
//
//   <pic:blipFill>
//     <a:blip r:embed="rId7"/>
//     <a:srcRect l="10000" t="0" r="5000" b="0"/>
//   </pic:blipFill>
//
// Crops are keyed by the relationship id of the blip. When one
// picture part is placed several times the first crop wins.

use std::{
    collections::HashMap,
    io::{Cursor, Read},
};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::domain::block::CropRect;

const DOCUMENT_PART: &str = "word/document.xml";

/// Crop rectangles of the body pictures, by relationship id.
/// Anything unreadable yields an empty map: crops are cosmetic.
pub fn read_crops(docx_bytes: &[u8]) -> HashMap<String, CropRect> {
    match document_xml(docx_bytes) {
        Ok(xml) => crops_from_xml(&xml),
        Err(e) => {
            tracing::debug!("No crop information: {}", e);
            HashMap::new()
        }
    }
}

fn document_xml(docx_bytes: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx_bytes))?;
    let mut part = archive.by_name(DOCUMENT_PART)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

pub fn crops_from_xml(xml: &str) -> HashMap<String, CropRect> {
    let mut reader = Reader::from_str(xml);
    let mut crops  = HashMap::new();
    let mut blip: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"blip" => blip = attr(&e, b"embed"),
                b"srcRect" => {
                    if let Some(id) = blip.as_ref() {
                        let crop = crop_from(&e);
                        if !crop.is_empty() {
                            crops.entry(id.clone()).or_insert(crop);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"blipFill" => blip = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!("Stopped reading picture crops: {}", e);
                break;
            }
            _ => {}
        }
    }

    crops
}

fn crop_from(e: &BytesStart<'_>) -> CropRect {
    let edge = |key: &[u8]| {
        attr(e, key)
            .and_then(|v| v.parse::<i64>().ok())
            .map(|v| v.clamp(0, 100_000) as u32)
            .unwrap_or(0)
    };

    CropRect {
        left:   edge(b"l"),
        top:    edge(b"t"),
        right:  edge(b"r"),
        bottom: edge(b"b"),
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const PICTURES: &str = r#"<w:document xmlns:w="w" xmlns:a="a" xmlns:r="r" xmlns:pic="pic">
      <w:body>
        <pic:blipFill><a:blip r:embed="rId7"/><a:srcRect l="10000" t="-500" r="5000"/></pic:blipFill>
        <pic:blipFill><a:blip r:embed="rId8"></a:blip><a:stretch/></pic:blipFill>
        <a:srcRect l="1"/>
        <pic:blipFill><a:blip r:embed="rId7"/><a:srcRect b="20000"/></pic:blipFill>
      </w:body>
    </w:document>"#;

    #[test]
    fn test_reads_crop_per_relationship() {
        let crops = crops_from_xml(PICTURES);
        assert_eq!(crops.len(), 1);
        assert_eq!(
            crops["rId7"],
            CropRect { left: 10_000, top: 0, right: 5_000, bottom: 0 }
        );
    }

    #[test]
    fn test_non_docx_bytes_give_no_crops() {
        assert!(read_crops(b"not a zip").is_empty());
    }
}
