// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod search_result;

pub use document::{Document, DocumentMetadata};
pub use search_result::{SearchResult, VectorRecord};
