// file: src/llm/ollama.rs
// description: streaming chat client for a locally hosted Ollama server
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion

use crate::config::ModelConfig;
use crate::error::{QaError, Result};
use crate::llm::{ChatMessage, LanguageModel, TextStream};
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::pin::Pin;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, PartialEq)]
enum ChatLine {
    Skip,
    Chunk(String),
    Done(String),
}

pub struct OllamaModel {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaModel {
    pub fn new(config: &ModelConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!("LLM client: {} at {}", config.model, base_url);

        Self {
            client: Client::new(),
            base_url,
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaModel {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<TextStream> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: &messages,
            stream: true,
        };

        debug!("Sending {} messages to {}", messages.len(), url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                QaError::Runtime(format!(
                    "Failed to connect to LLM at {}. Is the server running? {}",
                    self.base_url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QaError::Runtime(format!(
                "LLM API error ({}): {}",
                status, body
            )));
        }

        Ok(decode_chat_stream(response.bytes_stream()))
    }
}

fn parse_chat_line(line: &[u8]) -> Result<ChatLine> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return Ok(ChatLine::Skip);
    }

    let chunk: ChatChunk = serde_json::from_str(line)
        .map_err(|e| QaError::Runtime(format!("Failed to parse LLM stream chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(QaError::Runtime(format!("LLM reported an error: {}", error)));
    }

    let content = chunk.message.map(|m| m.content).unwrap_or_default();

    Ok(if chunk.done {
        ChatLine::Done(content)
    } else if content.is_empty() {
        ChatLine::Skip
    } else {
        ChatLine::Chunk(content)
    })
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    buffer: Vec<u8>,
    eof: bool,
    finished: bool,
}

/// Splits newline-delimited JSON on line boundaries, regardless of how the
/// transport chunks the body.
fn decode_chat_stream<S, B, E>(bytes: S) -> TextStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        buffer: Vec::new(),
        eof: false,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(pos) = state.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = state.buffer.drain(..=pos).collect();
                match parse_chat_line(&line) {
                    Ok(ChatLine::Skip) => continue,
                    Ok(ChatLine::Chunk(text)) => return Some((Ok(text), state)),
                    Ok(ChatLine::Done(text)) => {
                        state.finished = true;
                        if text.is_empty() {
                            return None;
                        }
                        return Some((Ok(text), state));
                    }
                    Err(e) => {
                        state.finished = true;
                        return Some((Err(e), state));
                    }
                }
            }

            if state.eof {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    state.finished = true;
                    let err = QaError::Runtime(format!("LLM stream interrupted: {}", e));
                    return Some((Err(err), state));
                }
                None => {
                    state.eof = true;
                    if !state.buffer.iter().all(|b| b.is_ascii_whitespace()) {
                        state.buffer.push(b'\n');
                    }
                }
            }
        }
    })
    .boxed()
}
