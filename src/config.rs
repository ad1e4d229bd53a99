// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{QaError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    pub embedder: EmbedderConfig,
    pub vector_store: VectorStoreConfig,
    pub model: ModelConfig,
    pub driver: DriverConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub url: String,
    pub verify_tls: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbedderConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorStoreConfig {
    pub uri: String,
    pub table_name: String,
    pub reindex: ReindexPolicy,
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub markdown: bool,
    pub show_references: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriverConfig {
    pub prompt: String,
}

/// What opening the store does when the collection already holds records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReindexPolicy {
    /// Keep existing records and append the new ones.
    #[default]
    Append,
    /// Drop the collection before indexing.
    Overwrite,
    /// Refuse to index into a populated collection.
    Fail,
}

/// Scoped TLS setting for one HTTP client. Never applied process-wide.
#[derive(Debug, Clone, Copy)]
pub struct HttpClientConfig {
    pub verify_tls: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { verify_tls: true }
    }
}

impl SourceConfig {
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            verify_tls: self.verify_tls,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| QaError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PDF_QA")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| QaError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| QaError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            source: SourceConfig {
                url: "https://tuba.gov.tr/files/yayinlar/bilim-ve-dusun/TUBA-978-605-2249-48-2_Ch9.pdf"
                    .to_string(),
                verify_tls: false,
            },
            embedder: EmbedderConfig {
                base_url: DEFAULT_OLLAMA_URL.to_string(),
                model: "llama3.1:8b".to_string(),
            },
            vector_store: VectorStoreConfig {
                uri: "tmp/lancedb".to_string(),
                table_name: "Ai".to_string(),
                reindex: ReindexPolicy::Append,
                top_k: 5,
            },
            model: ModelConfig {
                base_url: DEFAULT_OLLAMA_URL.to_string(),
                model: "llama3.1:8b".to_string(),
                markdown: true,
                show_references: true,
            },
            driver: DriverConfig {
                prompt: "sorunuzu giriniz:".to_string(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.source.url.as_str();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(QaError::Config(format!("Invalid source URL: {}", url)));
        }

        if self.vector_store.top_k == 0 {
            return Err(QaError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.vector_store.table_name.trim().is_empty() {
            return Err(QaError::Config("table_name must not be empty".to_string()));
        }

        if self.embedder.model.trim().is_empty() || self.model.model.trim().is_empty() {
            return Err(QaError::Config("model names must not be empty".to_string()));
        }

        Ok(())
    }
}
