//! `lopdf`-backed [`ContentSource`].

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::error::{IngestError, Result};
use crate::operation::{ContentSource, Operand, Operation};

/// A loaded PDF. Dropping it releases the document.
pub struct PdfDocument {
    doc: Document,
    /// (1-based page number, page object), in page order.
    pages: Vec<(u32, ObjectId)>,
}

impl PdfDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_document(doc))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|source| IngestError::Load { source })?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: Document) -> Self {
        let pages = doc.get_pages().into_iter().collect();
        Self { doc, pages }
    }
}

impl ContentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_operations(&self, index: usize) -> Result<Vec<Operation>> {
        let Some(&(page_num, page_id)) = self.pages.get(index) else {
            return Ok(Vec::new());
        };
        let data = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| IngestError::content(page_num, e))?;
        let content = Content::decode(&data).map_err(|e| IngestError::content(page_num, e))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| Operation {
                operands: op.operands.iter().map(to_operand).collect(),
                operator: op.operator,
            })
            .collect())
    }
}

fn to_operand(obj: &Object) -> Operand {
    match obj {
        Object::String(bytes, _) => Operand::Text(decode_text_string(bytes)),
        Object::Integer(i) => Operand::Number(*i as f64),
        Object::Real(r) => Operand::Number(*r as f64),
        Object::Name(name) => Operand::Name(String::from_utf8_lossy(name).into_owned()),
        _ => Operand::Other,
    }
}

/// PDF text string: UTF-16BE or UTF-8 when marked by a byte-order mark,
/// otherwise one byte per character.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"11771234-56781234"), "11771234-56781234");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x45, 0x01, 0x51]), "Eő");
        assert_eq!(decode_text_string(&[0xEF, 0xBB, 0xBF, 0xC5, 0x91]), "ő");
        assert_eq!(decode_text_string(&[0x49, 0x44, 0xD5]), "IDÕ");
    }

    #[test]
    fn test_operand_mapping() {
        assert_eq!(to_operand(&Object::Integer(3)), Operand::Number(3.0));
        assert_eq!(to_operand(&Object::Name(b"F1".to_vec())), Operand::Name("F1".into()));
        assert_eq!(to_operand(&Object::Null), Operand::Other);
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        assert!(matches!(
            PdfDocument::from_bytes(b"not a pdf"),
            Err(IngestError::Load { .. })
        ));
    }
}
