// file: src/database/mod.rs
// description: embedding and vector storage module exports
// reference: internal module structure

pub mod client;
pub mod embeddings;
pub mod insert;
pub mod schema;
pub mod store;

pub use client::LanceDbStore;
pub use embeddings::{Embedder, OllamaEmbedder};
pub use insert::create_record_batch;
pub use schema::SchemaManager;
pub use store::VectorStore;
