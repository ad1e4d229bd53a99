// file: src/pipeline/orchestrator.rs
// description: wires the document source, indexer and agent into one pipeline
// reference: fetch -> extract -> build -> index, then retrieve + generate

use crate::agent::{Agent, Answer};
use crate::database::VectorStore;
use crate::error::Result;
use crate::pipeline::indexer::Indexer;
use crate::pipeline::progress::IndexStats;
use crate::source::DocumentSource;
use std::sync::Arc;
use tracing::info;

pub struct Pipeline {
    source: Arc<dyn DocumentSource>,
    store: Arc<dyn VectorStore>,
    indexer: Indexer,
    agent: Agent,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn VectorStore>,
        indexer: Indexer,
        agent: Agent,
    ) -> Self {
        Self {
            source,
            store,
            indexer,
            agent,
        }
    }

    /// Loads the knowledge base from `url`.
    pub async fn load(&self, url: &str) -> Result<IndexStats> {
        info!("Loading knowledge base from {}", url);

        let documents = self.source.fetch(url).await?;
        let stats = self.indexer.index(documents).await?;

        let total = self.store.count().await?;
        info!("Knowledge base holds {} records", total);

        Ok(stats)
    }

    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.agent.answer(question).await
    }
}
