// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod indexer;
mod orchestrator;
mod progress;

pub use indexer::Indexer;
pub use orchestrator::Pipeline;
pub use progress::{IndexStats, ProgressTracker};
