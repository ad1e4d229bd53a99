// file: src/interactive.rs
// description: single-shot question prompt and incremental answer output

use crate::error::Result;
use crate::llm::TextStream;
use crate::models::SearchResult;
use crate::pipeline::{IndexStats, Pipeline};
use crate::utils::logging::format_error;
use futures::StreamExt;
use std::io::{BufRead, Write};

/// Loads `url` into the pipeline. On failure the error is reported on
/// `writer` and returned unchanged.
pub async fn load_knowledge_base<W: Write>(
    pipeline: &Pipeline,
    url: &str,
    writer: &mut W,
) -> Result<IndexStats> {
    match pipeline.load(url).await {
        Ok(stats) => Ok(stats),
        Err(e) => {
            writeln!(
                writer,
                "{}",
                format_error(&format!("Error loading knowledge base: {}", e))
            )?;
            writer.flush()?;
            Err(e)
        }
    }
}

/// Writes `prompt`, reads one line and strips only its line terminator.
pub fn read_question<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<String> {
    write!(writer, "{}", prompt)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(line)
}

pub fn write_references<W: Write>(writer: &mut W, references: &[SearchResult]) -> Result<()> {
    if references.is_empty() {
        writeln!(writer, "No references found in the knowledge base.")?;
        return Ok(());
    }

    let pages = references
        .iter()
        .map(|r| r.page.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(writer, "Searched knowledge base, pages: {}", pages)?;
    writeln!(writer)?;
    Ok(())
}

/// Flushes after every chunk. Returns the full answer text.
pub async fn write_answer<W: Write>(mut stream: TextStream, writer: &mut W) -> Result<String> {
    let mut answer = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(chunk.as_bytes())?;
        writer.flush()?;
        answer.push_str(&chunk);
    }

    writeln!(writer)?;
    writer.flush()?;
    Ok(answer)
}
