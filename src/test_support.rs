// file: src/test_support.rs
// description: shared fixtures and test doubles for unit tests
// reference: in-memory PDFs via lopdf, one-shot HTTP server via tokio

use crate::database::{Embedder, VectorStore};
use crate::error::{QaError, Result};
use crate::llm::{ChatMessage, LanguageModel, TextStream};
use crate::models::{Document, SearchResult, VectorRecord};
use crate::source::{DocumentSource, TextExtractor, build_documents};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object, Stream, dictionary};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One page per entry; `None` produces a page with an empty content stream.
pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Serves a single HTTP response on a random local port and returns its URL.
pub async fn serve_once(status: u16, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        let mut expected = None;
        loop {
            if expected.is_none() {
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    expected = Some(end + 4 + content_length(&request[..end]));
                }
            }
            if expected.is_some_and(|len| request.len() >= len) {
                break;
            }
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let head = format!(
            "HTTP/1.1 {} Test\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(&body).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}/doc.pdf", addr)
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Runs extraction on fixed bytes, ignoring the network.
pub struct StaticPdfSource {
    pub bytes: Vec<u8>,
    pub calls: AtomicUsize,
}

impl StaticPdfSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for StaticPdfSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pages = TextExtractor::new().extract_pages(&self.bytes)?;
        Ok(build_documents(url, pages))
    }
}

#[derive(Default)]
pub struct RecordingEmbedder {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
    /// Return an empty vector, as Ollama does for empty input.
    pub no_vector: bool,
}

impl RecordingEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn without_vectors() -> Self {
        Self {
            no_vector: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for RecordingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(QaError::Indexing("embedding service unavailable".to_string()));
        }
        if self.no_vector {
            return Ok(Vec::new());
        }
        Ok(vec![text.len() as f32, 1.0, 0.0])
    }
}

#[derive(Default)]
pub struct RecordingStore {
    pub records: Mutex<Vec<VectorRecord>>,
    pub upsert_calls: AtomicUsize,
    pub queries: Mutex<Vec<(Vec<f32>, usize)>>,
}

impl RecordingStore {
    pub fn records(&self) -> Vec<VectorRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().extend(records);
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.queries.lock().unwrap().push((vector.to_vec(), k));
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .take(k)
            .map(|r| {
                SearchResult::new(
                    r.id.clone(),
                    r.content.clone(),
                    r.source.clone(),
                    r.page,
                    Some(0.0),
                )
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.lock().unwrap().len())
    }
}

pub struct ScriptedModel {
    pub chunks: Vec<String>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<TextStream> {
        self.requests.lock().unwrap().push(messages);
        let chunks: Vec<Result<String>> = self.chunks.iter().cloned().map(Ok).collect();
        Ok(stream::iter(chunks).boxed())
    }
}
