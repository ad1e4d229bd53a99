// file: src/source/mod.rs
// description: document sources that turn a URL into page documents
// reference: internal module structure

pub mod builder;
pub mod fetcher;
pub mod pdf;

pub use builder::build_documents;
pub use fetcher::Fetcher;
pub use pdf::{PageText, TextExtractor};

use crate::error::Result;
use crate::models::Document;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<Document>>;
}

/// Fetch, extract, build. A failed fetch returns before any parsing.
pub async fn fetch_and_parse(fetcher: &Fetcher, url: &str) -> Result<Vec<Document>> {
    let bytes = fetcher.fetch(url).await?;
    let pages = TextExtractor::new().extract_pages(&bytes)?;
    let documents = build_documents(url, pages);

    info!("Read {} pages with text from {}", documents.len(), url);
    Ok(documents)
}

pub struct PdfUrlSource {
    fetcher: Fetcher,
}

impl PdfUrlSource {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl DocumentSource for PdfUrlSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Document>> {
        fetch_and_parse(&self.fetcher, url).await
    }
}
