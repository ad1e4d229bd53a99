// file: src/pipeline/indexer.rs
// description: embeds documents and writes them into the vector store
// reference: one embed call and one store call per document, failures propagate

use crate::database::{Embedder, VectorStore};
use crate::error::{QaError, Result};
use crate::models::{Document, VectorRecord};
use crate::pipeline::progress::{IndexStats, ProgressTracker};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    show_progress: bool,
    colored: bool,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            show_progress: false,
            colored: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    /// Consumes the documents; only their embedded records outlive this call.
    pub async fn index(&self, documents: Vec<Document>) -> Result<IndexStats> {
        info!("Indexing {} documents", documents.len());

        let mut tracker = if self.show_progress {
            ProgressTracker::new(documents.len(), self.colored)
        } else {
            ProgressTracker::hidden(documents.len())
        };

        let indexed_at = Utc::now().timestamp();

        for document in documents {
            tracker.set_page(document.page());

            if let Err(e) = self.index_one(&document, indexed_at).await {
                tracker.abandon();
                return Err(e);
            }

            tracker.inc_indexed(document.content.len() as u64);
        }

        tracker.finish();
        let stats = tracker.get_stats();
        info!("Indexed {}", stats.summary());
        Ok(stats)
    }

    async fn index_one(&self, document: &Document, indexed_at: i64) -> Result<()> {
        let vector = self
            .embedder
            .embed(&document.content)
            .await
            .map_err(into_indexing)?;

        if vector.is_empty() {
            return Err(QaError::Indexing(format!(
                "No embedding returned for page {} of {}",
                document.page(),
                document.source
            )));
        }

        let record = VectorRecord::from_document(document, vector, indexed_at);
        self.store
            .upsert(vec![record])
            .await
            .map_err(into_indexing)?;

        debug!("Indexed page {} of {}", document.page(), document.source);
        Ok(())
    }
}

fn into_indexing(err: QaError) -> QaError {
    match err {
        QaError::Indexing(_) => err,
        other => QaError::Indexing(other.to_string()),
    }
}
