const GREETING_KEYWORDS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "howdy",
    "hola",
];

const FILE_KEYWORDS: &[&str] = &[
    "sop",
    "procedure",
    "file",
    "document",
    "download",
    "send me",
    "give me",
    "show me",
    "need",
    "list",
];

/// Longest message still treated as a greeting, in whitespace tokens.
const MAX_GREETING_TOKENS: usize = 3;

/// How a chat message should be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    FileRequest,
    Question,
}

impl Intent {
    /// Classify a raw message. Keywords are plain substring matches, so
    /// "hi" also fires inside "this"; the token bound keeps that to short
    /// messages. Greeting wins over FileRequest, which wins over Question.
    pub fn classify(message: &str) -> Self {
        let normalized = message.trim().to_lowercase();

        let is_greeting = contains_any(&normalized, GREETING_KEYWORDS)
            && normalized.split_whitespace().count() <= MAX_GREETING_TOKENS;
        if is_greeting {
            return Intent::Greeting;
        }

        if contains_any(&normalized, FILE_KEYWORDS) {
            return Intent::FileRequest;
        }

        Intent::Question
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
