// file: src/models/search_result.rs
// description: stored vector records and similarity search results
// reference: Used for vector similarity search results

use crate::models::Document;
use serde::{Deserialize, Serialize};

/// One embedded page as written to the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Content hash of the source document
    pub id: String,

    pub content: String,

    /// URL the PDF was fetched from
    pub source: String,

    pub page: u32,

    /// Unix timestamp (seconds) of the indexing run
    pub indexed_at: i64,

    pub vector: Vec<f32>,
}

impl VectorRecord {
    pub fn from_document(document: &Document, vector: Vec<f32>, indexed_at: i64) -> Self {
        Self {
            id: document.content_hash(),
            content: document.content.clone(),
            source: document.source.clone(),
            page: document.page(),
            indexed_at,
            vector,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,

    pub content: String,

    pub source: String,

    pub page: u32,

    /// Similarity score (higher is more similar, typically 0.0-1.0)
    pub score: f32,

    /// Optional: Distance metric (lower is more similar)
    pub distance: Option<f32>,
}

impl SearchResult {
    pub fn new(
        id: String,
        content: String,
        source: String,
        page: u32,
        distance: Option<f32>,
    ) -> Self {
        // score = 1 / (1 + distance); no distance column means an exact hit
        let score = distance.map(|d| 1.0 / (1.0 + d)).unwrap_or(1.0);

        Self {
            id,
            content,
            source,
            page,
            score,
            distance,
        }
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = if self.content.chars().count() > max_content_len {
            let truncated: String = self.content.chars().take(max_content_len).collect();
            format!("{}...", truncated)
        } else {
            self.content.clone()
        };

        format!(
            "Score: {:.4} | page {} ({})\n{}\n",
            self.score, self.page, self.source, content_preview
        )
    }
}
