// file: src/database/embeddings.rs
// description: Ollama API integration for text embeddings
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-embeddings

use crate::config::EmbedderConfig;
use crate::error::{QaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text to fixed-length vector. Indexing and querying must share one instance.
/// An empty vector means the backend produced no embedding for the input,
/// which Ollama does for empty text.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbedderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embed", self.base_url);

        let request = OllamaEmbedRequest {
            model: &self.model,
            input: text,
        };

        debug!("Requesting embedding from Ollama for {} chars", text.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                QaError::Indexing(format!("Failed to send Ollama embedding request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QaError::Indexing(format!(
                "Ollama embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: OllamaEmbedResponse = response.json().await.map_err(|e| {
            QaError::Indexing(format!("Failed to parse Ollama embedding response: {}", e))
        })?;

        first_embedding(body)
    }
}

fn first_embedding(response: OllamaEmbedResponse) -> Result<Vec<f32>> {
    let embedding = response.embeddings.into_iter().next().unwrap_or_default();
    if embedding.is_empty() {
        debug!("Ollama returned no embedding");
    } else {
        debug!("Received embedding of dimension {}", embedding.len());
    }
    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn test_parse_embed_response() {
        let body: OllamaEmbedResponse = serde_json::from_str(
            r#"{"model":"llama3.1:8b","embeddings":[[0.1,-0.2,0.3]]}"#,
        )
        .unwrap();

        assert_eq!(first_embedding(body).unwrap(), vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_empty_embed_response_yields_no_vector() {
        let body: OllamaEmbedResponse = serde_json::from_str(r#"{"embeddings":[]}"#).unwrap();
        assert!(first_embedding(body).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embed_empty_text_against_server() {
        let url = serve_once(200, br#"{"model":"llama3.1:8b","embeddings":[]}"#.to_vec()).await;
        let base_url = url.trim_end_matches("/doc.pdf").to_string();
        let embedder = OllamaEmbedder::new(&EmbedderConfig {
            base_url,
            model: "llama3.1:8b".to_string(),
        });

        assert!(embedder.embed("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embed_server_error_is_indexing_error() {
        let url = serve_once(500, b"model not loaded".to_vec()).await;
        let embedder = OllamaEmbedder::new(&EmbedderConfig {
            base_url: url.trim_end_matches("/doc.pdf").to_string(),
            model: "llama3.1:8b".to_string(),
        });

        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, QaError::Indexing(_)));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let embedder = OllamaEmbedder::new(&EmbedderConfig {
            base_url: "http://localhost:11434/".to_string(),
            model: "llama3.1:8b".to_string(),
        });
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.model, "llama3.1:8b");
    }
}
