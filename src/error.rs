// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QaError>;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch PDF from {url}, status code: {status}")]
    Fetch { url: String, status: u16 },

    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("PDF parsing error: {0}")]
    Parse(String),

    #[error("Indexing error: {0}")]
    Indexing(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mentions_url_and_status() {
        let err = QaError::Fetch {
            url: "https://example.com/doc.pdf".to_string(),
            status: 404,
        };
        let message = err.to_string();

        assert!(message.contains("https://example.com/doc.pdf"));
        assert!(message.contains("404"));
    }
}
