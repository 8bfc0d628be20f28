//! Classification extension point
//!
//! The extractor runs every document through a `Classifier`. The stock
//! implementation is a no-op that returns the unclassified default; a real
//! model can be substituted without touching extraction control flow.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::DEFAULT_CATEGORY;

/// Output of the classification/field-extraction step.
///
/// `field_records` follows a header/line-items shape: zero or more field maps
/// per document. Only the first is surfaced on the extraction record.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Classification label
    pub category: String,
    /// Raw confidence score; coerced to an integer on the record
    pub confidence: f64,
    /// Structured field records, most significant first
    pub field_records: Vec<BTreeMap<String, String>>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            confidence: 0.0,
            field_records: Vec::new(),
        }
    }
}

/// Pluggable document classifier
pub trait Classifier: Send + Sync {
    /// Classify a document from its extracted content.
    ///
    /// Errors are absorbed by the extractor, which substitutes the default
    /// classification; a failing classifier never fails a document.
    fn classify(&self, content: &str) -> Result<Classification>;
}

/// Placeholder classifier: every document is unclassified with score 0
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

impl Classifier for NoopClassifier {
    fn classify(&self, _content: &str) -> Result<Classification> {
        Ok(Classification::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_returns_default() {
        let result = NoopClassifier.classify("some document text").unwrap();
        assert_eq!(result.category, DEFAULT_CATEGORY);
        assert_eq!(result.confidence, 0.0);
        assert!(result.field_records.is_empty());
    }
}
