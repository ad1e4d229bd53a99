// file: src/source/fetcher.rs
// description: HTTP retrieval of PDF bytes with per-client TLS settings
// reference: https://docs.rs/reqwest

use crate::config::HttpClientConfig;
use crate::error::{QaError, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        if !config.verify_tls {
            warn!("TLS certificate verification is disabled for PDF downloads");
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| QaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Fetching PDF from {}", url);

        let response = self.client.get(url).send().await.map_err(|e| QaError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        check_status(url, response.status())?;

        let bytes = response.bytes().await.map_err(|e| QaError::Http {
            url: url.to_string(),
            message: format!("Failed to read response body: {}", e),
        })?;

        debug!("Received {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Anything but 200 OK is a fetch failure, including other 2xx codes.
fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status != StatusCode::OK {
        return Err(QaError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn test_check_status() {
        assert!(check_status("u", StatusCode::OK).is_ok());

        for status in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND, StatusCode::BAD_GATEWAY] {
            match check_status("https://example.com/doc.pdf", status) {
                Err(QaError::Fetch { url, status: code }) => {
                    assert_eq!(url, "https://example.com/doc.pdf");
                    assert_eq!(code, status.as_u16());
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let url = serve_once(200, b"%PDF-1.5 fake".to_vec()).await;
        let fetcher = Fetcher::new(HttpClientConfig::default()).unwrap();

        let bytes = fetcher.fetch(&url).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.5 fake");
    }

    #[tokio::test]
    async fn test_fetch_reports_status() {
        let url = serve_once(404, b"not here".to_vec()).await;
        let fetcher = Fetcher::new(HttpClientConfig { verify_tls: false }).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, QaError::Fetch { status: 404, .. }));
        assert!(err.to_string().contains(&url));
    }
}
