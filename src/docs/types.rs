use serde::{Deserialize, Serialize};

/// Route prefix under which corpus files are served.
pub const DOWNLOAD_PREFIX: &str = "/download";

/// Documents loaded once at startup. Read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Every document's text, each preceded by a `=== name ===` header.
    pub text: String,
    /// Filenames in load order.
    pub filenames: Vec<String>,
}

impl Corpus {
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Append one document under its section header.
    pub fn push(&mut self, filename: &str, content: &str) {
        self.text.push_str(&format!("\n\n=== {} ===\n{}", filename, content));
        self.filenames.push(filename.to_string());
    }
}

/// A downloadable corpus file as returned to chat clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub filename: String,
    pub path: String,
}

impl DocumentLink {
    pub fn for_file(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            path: format!("{}/{}", DOWNLOAD_PREFIX, filename),
        }
    }
}
