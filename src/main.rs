// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use pdf_qa::utils::logging::format_success;
use pdf_qa::{
    Agent, AgentOptions, Config, Fetcher, Indexer, LanceDbStore, OllamaEmbedder, OllamaModel,
    PdfUrlSource, Pipeline, load_knowledge_base, read_question, write_answer, write_references,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pdf_qa")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Ask a local LLM a question about a PDF fetched from a URL", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// PDF to index instead of the configured one
    #[arg(long, value_name = "URL")]
    url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    pdf_qa::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    if let Some(url) = cli.url {
        config.source.url = url;
        config.validate().context("Invalid --url")?;
    }

    let pipeline = build_pipeline(&config, cli.color).await?;

    let stdin = io::stdin();
    let stdout = io::stdout();

    let stats = load_knowledge_base(&pipeline, &config.source.url, &mut stdout.lock())
        .await
        .context("Knowledge base load failed")?;
    eprintln!(
        "{}",
        format_success(&format!("Knowledge base loaded: {}", stats.summary()))
    );
    let question = read_question(&mut stdin.lock(), &mut stdout.lock(), &config.driver.prompt)
        .context("Failed to read question")?;

    let answer = pipeline
        .ask(&question)
        .await
        .context("Failed to answer question")?;

    let mut out = stdout.lock();
    if config.model.show_references {
        write_references(&mut out, &answer.references)?;
    }
    write_answer(answer.stream, &mut out)
        .await
        .context("Failed to stream answer")?;
    out.flush()?;

    Ok(())
}

async fn build_pipeline(config: &Config, colored: bool) -> Result<Pipeline> {
    let fetcher = Fetcher::new(config.source.http_client_config())
        .context("Failed to create HTTP client")?;
    let source = Arc::new(PdfUrlSource::new(fetcher));

    let store = Arc::new(
        LanceDbStore::open(&config.vector_store)
            .await
            .context("Failed to open LanceDB store")?,
    );
    let embedder = Arc::new(OllamaEmbedder::new(&config.embedder));
    let model = Arc::new(OllamaModel::new(&config.model));

    let indexer = Indexer::new(embedder.clone(), store.clone()).with_progress(true, colored);
    let agent = Agent::new(
        embedder,
        store.clone(),
        model,
        AgentOptions {
            top_k: config.vector_store.top_k,
            markdown: config.model.markdown,
        },
    );

    Ok(Pipeline::new(source, store, indexer, agent))
}
