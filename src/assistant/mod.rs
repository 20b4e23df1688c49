pub mod intent;
pub mod matcher;
pub mod prompts;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::docs::types::{Corpus, DocumentLink};
use crate::llm::{self, InferenceBackend};

use intent::Intent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<DocumentLink>>,
}

impl ChatResponse {
    fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            files: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
}

/// Routes each chat message to a greeting, a document list, or a model answer.
pub struct Assistant {
    corpus: Arc<Corpus>,
    backend: Arc<dyn InferenceBackend>,
    knowledge: String,
    rng: Mutex<fastrand::Rng>,
}

impl Assistant {
    pub fn new(corpus: Arc<Corpus>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            corpus,
            backend,
            knowledge: prompts::COMPANY_CONTEXT.to_string(),
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Seed greeting selection.
    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_knowledge(mut self, knowledge: impl Into<String>) -> Self {
        self.knowledge = knowledge.into();
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn backend(&self) -> &dyn InferenceBackend {
        self.backend.as_ref()
    }

    pub async fn respond(&self, message: &str) -> Result<ChatResponse, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let intent = Intent::classify(message);
        match intent {
            Intent::Greeting => {
                info!("Greeting detected - returning friendly response");
                return Ok(ChatResponse::text(self.pick_greeting()));
            }
            Intent::FileRequest if !self.corpus.is_empty() => {
                return Ok(self.file_reply(message));
            }
            Intent::FileRequest | Intent::Question => {}
        }

        let prompt = prompts::assemble(&self.knowledge, &self.corpus.text, message);
        let answer = llm::generate_or_fallback(self.backend.as_ref(), &prompt).await;
        info!(?intent, prompt_len = prompt.len(), "AI: {}", preview(&answer));

        Ok(ChatResponse::text(answer))
    }

    fn file_reply(&self, message: &str) -> ChatResponse {
        let files = matcher::match_documents(message, &self.corpus);
        if files.is_empty() {
            return ChatResponse::text(prompts::NO_MATCHING_DOCUMENTS);
        }

        info!(count = files.len(), "Returning matched file(s)");
        ChatResponse {
            response: prompts::files_found(&files),
            files: Some(files),
        }
    }

    fn pick_greeting(&self) -> &'static str {
        let idx = match self.rng.lock() {
            Ok(mut rng) => rng.usize(..prompts::GREETINGS.len()),
            // A panicked holder cannot leave an Rng in a bad state
            Err(poisoned) => poisoned.into_inner().usize(..prompts::GREETINGS.len()),
        };
        prompts::GREETINGS[idx]
    }
}

/// First 100 characters, for log lines.
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(100) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
