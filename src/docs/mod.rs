pub mod ingest;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use ingest::DocFormat;
use types::Corpus;

/// Load every readable `.docx`/`.txt` file directly under `dir`.
///
/// A missing directory yields an empty corpus. Files that fail to read are
/// logged and skipped, as are files with no text. Entries are visited in
/// filename order.
pub fn load_corpus(dir: &Path) -> Result<Corpus> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "Documents directory not found");
        return Ok(Corpus::default());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                warn!("Error reading directory entry: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut corpus = Corpus::default();
    for path in paths {
        let Some(format) = DocFormat::from_path(&path) else {
            debug!(path = %path.display(), "Skipping unsupported file");
            continue;
        };
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match ingest::extract_text(&path, format) {
            Ok(content) if !content.is_empty() => {
                corpus.push(name, &content);
                info!("Loaded: {}", name);
            }
            Ok(_) => debug!(name, "Skipping empty document"),
            Err(e) => warn!("Error loading {}: {:#}", name, e),
        }
    }

    Ok(corpus)
}
