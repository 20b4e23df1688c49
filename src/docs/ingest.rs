use std::path::Path;

use anyhow::{Context, Result};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};

/// File formats the loader knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Docx,
    Text,
}

impl DocFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "docx" => Some(DocFormat::Docx),
            "txt" => Some(DocFormat::Text),
            _ => None,
        }
    }
}

/// Extract the visible text of a file in the given format.
pub fn extract_text(path: &Path, format: DocFormat) -> Result<String> {
    match format {
        DocFormat::Text => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file {}", path.display())),
        DocFormat::Docx => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            docx_text(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
        }
    }
}

/// Paragraph text of a .docx body joined by newlines. Blank paragraphs are
/// dropped; tables and headers are not part of the body paragraphs.
fn docx_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            // Hyperlinks wrap their own runs
            ParagraphChild::Hyperlink(link) => out.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    out
}
