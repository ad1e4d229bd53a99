// file: src/models/document.rs
// description: page-level document model produced from a fetched PDF
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// 1-based physical page index in the source PDF
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Returns `None` when `content` has no non-whitespace characters.
    pub fn new(content: String, source: impl Into<String>, page: u32) -> Option<Self> {
        if content.trim().is_empty() {
            return None;
        }

        Some(Self {
            content,
            source: source.into(),
            metadata: DocumentMetadata { page },
        })
    }

    pub fn page(&self) -> u32 {
        self.metadata.page
    }

    /// Stable identifier over source, page and content.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hasher.update(self.metadata.page.to_le_bytes());
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new(
            "Chapter 9".to_string(),
            "https://example.com/doc.pdf",
            3,
        )
        .unwrap();

        assert_eq!(doc.source, "https://example.com/doc.pdf");
        assert_eq!(doc.page(), 3);
        assert_eq!(doc.content, "Chapter 9");
    }

    #[test]
    fn test_whitespace_content_rejected() {
        assert!(Document::new("  \n\t ".to_string(), "src", 1).is_none());
        assert!(Document::new(String::new(), "src", 1).is_none());
    }

    #[test]
    fn test_hash_consistency() {
        let a = Document::new("Test content".to_string(), "src", 1).unwrap();
        let b = Document::new("Test content".to_string(), "src", 1).unwrap();
        let c = Document::new("Test content".to_string(), "src", 2).unwrap();

        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }
}
