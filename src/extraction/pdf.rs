//! Per-document PDF text extraction
//!
//! Failures are isolated at the smallest possible granularity: a page that
//! fails to extract contributes an empty text segment (its marker is still
//! emitted, preserving page count), a classifier failure degrades to the
//! unclassified default, and only an unparseable document fails the record.

use lopdf::{Document, Object};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::extraction::classifier::{Classification, Classifier, NoopClassifier};
use crate::types::ExtractionRecord;

/// Marker appended after each page's text
pub const NEXT_PAGE_MARKER: &str = "|next page|";
/// Marker appended after the final page
pub const END_OF_FILE_MARKER: &str = "|end of file|";

/// Extracts text, metadata, and classification from single PDF documents
pub struct DocumentExtractor {
    classifier: Arc<dyn Classifier>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(Arc::new(NoopClassifier))
    }
}

impl DocumentExtractor {
    /// Create an extractor with the given classifier
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Extract one PDF into a record.
    ///
    /// `display_name` is the archive-relative member path; only its last
    /// segment becomes the record's filename. Empty input fails with
    /// `InvalidInput`, an unparseable buffer with `ParseFailure`; neither
    /// escapes the batch layer as a panic.
    pub fn extract(&self, pdf_bytes: &[u8], display_name: &str) -> Result<ExtractionRecord> {
        if pdf_bytes.is_empty() {
            return Err(Error::invalid_input(format!(
                "empty document bytes for '{}'",
                display_name
            )));
        }

        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| Error::parse_failure(display_name, e.to_string()))?;

        let mut content = String::new();
        content.push_str(&metadata_header(&doc));
        content.push_str("\n\n");

        for (page_number, _object_id) in doc.get_pages() {
            let text = doc.extract_text(&[page_number]).unwrap_or_default();
            content.push_str(&format!(
                "\n--- Page {} ---\n{}\n{}\n\n",
                page_number, text, NEXT_PAGE_MARKER
            ));
        }
        content.push_str(&format!("\n{}\n", END_OF_FILE_MARKER));

        let classification = match self.classifier.classify(&content) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Classifier failed for '{}': {}", display_name, e);
                Classification::default()
            }
        };

        let extracted_fields = classification
            .field_records
            .into_iter()
            .next()
            .unwrap_or_default();
        let confidence = if classification.confidence.is_finite() {
            classification.confidence as i64
        } else {
            0
        };

        Ok(ExtractionRecord {
            filename: base_name(display_name).to_string(),
            category: classification.category,
            classification_confidence: confidence,
            extracted_fields,
            content,
        })
    }
}

/// Serialize the Info dictionary as `"key: value"` lines, one per non-empty
/// value, preserving dictionary order. Missing or malformed Info yields an
/// empty header.
fn metadata_header(doc: &Document) -> String {
    let Some(info) = info_dict(doc) else {
        return String::new();
    };

    let mut lines = Vec::new();
    for (key, value) in info.iter() {
        let Some(text) = object_text(value) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        lines.push(format!("{}: {}", String::from_utf8_lossy(key), text));
    }
    lines.join("\n")
}

fn info_dict(doc: &Document) -> Option<&lopdf::Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info.as_reference() {
        Ok(id) => doc.get_object(id).ok()?.as_dict().ok(),
        Err(_) => info.as_dict().ok(),
    }
}

/// Render a metadata value as text; unsupported object kinds are omitted
fn object_text(value: &Object) -> Option<String> {
    match value {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).trim().to_string()),
        Object::Name(name) => Some(String::from_utf8_lossy(name).to_string()),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Last path segment of an archive member name
fn base_name(display_name: &str) -> &str {
    display_name.rsplit('/').next().unwrap_or(display_name)
}
