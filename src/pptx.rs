//! PPTX reference-text extraction.
//!
//! Reads a presentation byte stream and returns the text of every shape, slide
//! by slide in authoring order, joined with newlines. Only the text runs are
//! kept; layout, styling, and positions are ignored.

use crate::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// Extract the reference text from PPTX bytes.
///
/// Returns an empty string when no shape carries text; that is not an error.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Pptx(format!("Failed to open archive: {}", e)))?;

    let mut texts: Vec<String> = Vec::new();
    for slide_path in slide_order(&mut archive)? {
        let xml = read_archive_file(&mut archive, &slide_path)?;
        collect_shape_texts(&xml, &mut texts)?;
    }

    Ok(texts.join("\n"))
}

/// Ordered slide part paths: `sldIdLst` in `ppt/presentation.xml` gives the
/// slide order as relationship ids, which the `.rels` part maps to targets.
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let presentation = read_archive_file(archive, "ppt/presentation.xml")?;
    let rel_ids = slide_rel_ids(&presentation)?;

    let rels = read_archive_file(archive, "ppt/_rels/presentation.xml.rels")?;
    let targets = relationship_targets(&rels)?;

    let mut paths = Vec::with_capacity(rel_ids.len());
    for rel_id in rel_ids {
        let target = targets
            .get(&rel_id)
            .ok_or_else(|| Error::Pptx(format!("Unresolved slide relationship '{}'", rel_id)))?;
        let full_path = if let Some(stripped) = target.strip_prefix('/') {
            stripped.to_string()
        } else {
            format!("ppt/{}", target)
        };
        paths.push(full_path);
    }

    Ok(paths)
}

/// Relationship ids of the `sldId` entries, in document order.
fn slide_rel_ids(presentation_xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(presentation_xml);
    reader.trim_text(true);

    let mut rel_ids = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r:id" {
                        rel_ids.push(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Pptx(format!("Error parsing presentation.xml: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rel_ids)
}

/// Map of relationship id to target path from a `.rels` part.
fn relationship_targets(rels_xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(rels_xml);
    reader.trim_text(true);

    let mut targets = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if !id.is_empty() {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Pptx(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Append the text of every text-bearing shape in a slide, in document order.
///
/// A shape with a text body but no runs still contributes an empty entry, the
/// same as a presentation library exposing an empty `text` property.
fn collect_shape_texts(slide_xml: &str, texts: &mut Vec<String>) -> Result<()> {
    let mut reader = Reader::from_str(slide_xml);
    reader.trim_text(true);

    let mut in_shape = false;
    let mut has_text_body = false;
    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut paragraph_started = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    in_shape = true;
                    has_text_body = false;
                    current_text.clear();
                }
                b"txBody" if in_shape => {
                    in_text_body = true;
                    has_text_body = true;
                    paragraph_started = false;
                }
                b"p" if in_text_body => {
                    in_paragraph = true;
                    if paragraph_started {
                        current_text.push('\n');
                    }
                    paragraph_started = true;
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_paragraph {
                    let text = e.unescape().unwrap_or_default();
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if in_shape && has_text_body {
                        texts.push(current_text.clone());
                    }
                    in_shape = false;
                    in_text_body = false;
                    in_paragraph = false;
                    current_text.clear();
                }
                b"txBody" => in_text_body = false,
                b"p" => in_paragraph = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Pptx(format!("Error parsing slide XML: {}", e)));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Read a file from the ZIP archive.
fn read_archive_file<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Pptx(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Pptx(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
