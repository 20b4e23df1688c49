use crate::docs::types::{Corpus, DocumentLink};

use super::intent::contains_any;

/// Words that ask for the whole catalogue when nothing specific matched.
const BROAD_REQUEST_KEYWORDS: &[&str] = &["all", "list", "available", "show"];

/// Tokens this short or shorter never select a document.
const MIN_TOKEN_CHARS: usize = 3;

/// Pick the corpus documents a file request refers to.
///
/// A document matches when any message token longer than three characters
/// occurs in its lower-cased filename. With no match, a broad request
/// returns the whole corpus. Results keep corpus order.
pub fn match_documents(message: &str, corpus: &Corpus) -> Vec<DocumentLink> {
    let normalized = message.trim().to_lowercase();
    let tokens: Vec<&str> = normalized
        .split_whitespace()
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS)
        .collect();

    let matched: Vec<DocumentLink> = corpus
        .filenames
        .iter()
        .filter(|name| {
            let name_lower = name.to_lowercase();
            tokens.iter().any(|t| name_lower.contains(t))
        })
        .map(|name| DocumentLink::for_file(name))
        .collect();

    if matched.is_empty() && contains_any(&normalized, BROAD_REQUEST_KEYWORDS) {
        return corpus
            .filenames
            .iter()
            .map(|name| DocumentLink::for_file(name))
            .collect();
    }

    matched
}
