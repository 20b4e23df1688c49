use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::assistant::Assistant;
use crate::docs::types::Corpus;
use crate::llm::InferenceBackend;

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub ollama_base_url: String,
    pub model: String,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub docs_dir: PathBuf,
    pub bind_addr: String,
    /// Replaces the built-in company knowledge when set.
    pub knowledge_file: Option<PathBuf>,
    /// Fixes greeting selection, mainly for demos.
    pub greeting_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            model: "llama2:7b".to_string(),
            llm_timeout: Duration::from_secs(60),
            llm_max_retries: 0,
            docs_dir: PathBuf::from("../SOPs-feed"),
            bind_addr: "0.0.0.0:8000".to_string(),
            knowledge_file: None,
            greeting_seed: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ollama_base_url: dotenv::var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            model: dotenv::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            llm_timeout: dotenv::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.llm_timeout),
            llm_max_retries: dotenv::var("LLM_MAX_RETRIES")
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(defaults.llm_max_retries),
            docs_dir: dotenv::var("SOPS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.docs_dir),
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            knowledge_file: dotenv::var("KNOWLEDGE_FILE").ok().map(PathBuf::from),
            greeting_seed: dotenv::var("GREETING_SEED")
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub docs_dir: PathBuf,
}

impl AppState {
    pub fn new(assistant: Assistant, docs_dir: PathBuf) -> Self {
        Self {
            assistant: Arc::new(assistant),
            docs_dir,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        self.assistant.corpus()
    }

    pub fn backend(&self) -> &dyn InferenceBackend {
        self.assistant.backend()
    }
}
