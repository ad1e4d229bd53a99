// file: src/source/builder.rs
// description: wraps extracted page text into Document records

use crate::models::Document;
use crate::source::pdf::PageText;

pub fn build_documents(source: &str, pages: Vec<PageText>) -> Vec<Document> {
    pages
        .into_iter()
        .filter_map(|page| Document::new(page.text, source, page.page))
        .collect()
}
