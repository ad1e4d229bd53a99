// file: src/agent.rs
// description: retrieval-augmented answering over the indexed knowledge base
// reference: embeds the question, retrieves top-k pages, streams the model answer

use crate::database::{Embedder, VectorStore};
use crate::error::{QaError, Result};
use crate::llm::{ChatMessage, LanguageModel, TextStream};
use crate::models::SearchResult;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions about a PDF document. \
     Base your answer on the references from the knowledge base when they are relevant.";

const MARKDOWN_INSTRUCTION: &str = "Use markdown to format your answers.";

#[derive(Debug, Clone, Copy)]
pub struct AgentOptions {
    pub top_k: usize,
    pub markdown: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            markdown: true,
        }
    }
}

pub struct Answer {
    pub references: Vec<SearchResult>,
    pub stream: TextStream,
}

pub struct Agent {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    model: Arc<dyn LanguageModel>,
    options: AgentOptions,
}

impl Agent {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        model: Arc<dyn LanguageModel>,
        options: AgentOptions,
    ) -> Self {
        Self {
            embedder,
            store,
            model,
            options,
        }
    }

    /// The question is passed through as typed, empty or not. When the
    /// embedder yields no vector the model is asked without references.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        debug!("Answering question of {} chars", question.len());

        let vector = self.embedder.embed(question).await.map_err(into_runtime)?;

        let references = if vector.is_empty() {
            warn!("No embedding for the question, answering without references");
            Vec::new()
        } else {
            self.store
                .query(&vector, self.options.top_k)
                .await
                .map_err(into_runtime)?
        };

        info!("Retrieved {} references", references.len());
        for reference in &references {
            debug!("{}", reference.format_summary(80));
        }

        let messages = build_messages(question, &references, self.options.markdown);
        let stream = self.model.generate(messages).await.map_err(into_runtime)?;

        Ok(Answer { references, stream })
    }
}

fn into_runtime(err: QaError) -> QaError {
    match err {
        QaError::Runtime(_) => err,
        other => QaError::Runtime(other.to_string()),
    }
}

pub fn build_messages(
    question: &str,
    references: &[SearchResult],
    markdown: bool,
) -> Vec<ChatMessage> {
    let mut system = SYSTEM_PROMPT.to_string();
    if markdown {
        system.push(' ');
        system.push_str(MARKDOWN_INSTRUCTION);
    }

    let user = if references.is_empty() {
        question.to_string()
    } else {
        let context = references
            .iter()
            .map(|r| format!("[page {}]\n{}", r.page, r.content.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "Use the following references from the knowledge base if they help answer the question.\n\
             <references>\n{}\n</references>\n\n{}",
            context, question
        )
    };

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
