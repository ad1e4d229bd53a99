// file: src/database/store.rs
// description: vector store abstraction used by the indexer and the agent

use crate::error::Result;
use crate::models::{SearchResult, VectorRecord};
use async_trait::async_trait;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Writes records into the configured collection. No deduplication.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Nearest neighbours of `vector`, most similar first, at most `k`.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    async fn count(&self) -> Result<usize>;
}
