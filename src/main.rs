mod assistant;
mod docs;
mod llm;
mod routes;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use assistant::Assistant;
use docs::types::Corpus;
use llm::{InferenceBackend, OllamaClient};
use state::{AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let settings = Settings::from_env();

    info!("{}", "=".repeat(60));
    info!("=== Starting Oncosimis AI Assistant ===");
    info!("{}", "=".repeat(60));

    if !settings.docs_dir.exists() {
        std::fs::create_dir_all(&settings.docs_dir).with_context(|| {
            format!("Failed to create {}", settings.docs_dir.display())
        })?;
        warn!(dir = %settings.docs_dir.display(), "Created documents directory");
    }

    let corpus = Arc::new(load_documents(settings.docs_dir.clone()).await);

    let ollama = Arc::new(OllamaClient::new(
        &settings.ollama_base_url,
        &settings.model,
        settings.llm_timeout,
        settings.llm_max_retries,
    )?);
    ollama.log_startup_probe().await;

    let backend: Arc<dyn InferenceBackend> = ollama;
    let mut assistant = Assistant::new(corpus.clone(), backend);
    if let Some(path) = &settings.knowledge_file {
        let knowledge = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file {}", path.display()))?;
        info!(path = %path.display(), "Using custom company knowledge");
        assistant = assistant.with_knowledge(knowledge);
    }
    if let Some(seed) = settings.greeting_seed {
        assistant = assistant.with_rng(fastrand::Rng::with_seed(seed));
    }
    let app = routes::router(AppState::new(assistant, settings.docs_dir.clone()));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

    info!("{}", "=".repeat(60));
    info!("Backend running on http://{}", settings.bind_addr);
    info!("Documents directory: {}", settings.docs_dir.display());
    info!("Documents loaded: {}", corpus.len());
    info!("{}", "=".repeat(60));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down Oncosimis AI Assistant...");
    Ok(())
}

/// Load the corpus off the async runtime. Any failure leaves it empty.
async fn load_documents(dir: PathBuf) -> Corpus {
    let loaded = tokio::task::spawn_blocking(move || docs::load_corpus(&dir)).await;
    let corpus = match loaded {
        Ok(Ok(corpus)) => corpus,
        Ok(Err(e)) => {
            error!("Error loading documents: {:#}", e);
            Corpus::default()
        }
        Err(e) => {
            error!("Document loader task failed: {}", e);
            Corpus::default()
        }
    };

    if corpus.is_empty() {
        warn!("No documents loaded - documents directory empty or unreadable");
        return corpus;
    }

    info!("Loaded {} SOP documents", corpus.len());
    for name in corpus.filenames.iter().take(5) {
        info!("   {}", name);
    }
    if corpus.len() > 5 {
        info!("   ... and {} more", corpus.len() - 5);
    }
    corpus
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
