// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod agent;
pub mod config;
pub mod database;
pub mod error;
pub mod interactive;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use agent::{Agent, AgentOptions, Answer};
pub use config::{
    Config, DriverConfig, EmbedderConfig, HttpClientConfig, ModelConfig, ReindexPolicy,
    SourceConfig, VectorStoreConfig,
};
pub use database::{Embedder, LanceDbStore, OllamaEmbedder, SchemaManager, VectorStore};
pub use error::{QaError, Result};
pub use interactive::{load_knowledge_base, read_question, write_answer, write_references};
pub use llm::{ChatMessage, LanguageModel, OllamaModel, TextStream};
pub use models::{Document, DocumentMetadata, SearchResult, VectorRecord};
pub use pipeline::{IndexStats, Indexer, Pipeline, ProgressTracker};
pub use source::{
    DocumentSource, Fetcher, PageText, PdfUrlSource, TextExtractor, build_documents,
    fetch_and_parse,
};
