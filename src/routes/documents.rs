use std::io::ErrorKind;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use crate::state::AppState;

use super::error::ApiError;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Serialize)]
pub struct DocumentList {
    pub documents: Vec<String>,
    pub count: usize,
    pub directory: String,
}

/// GET /documents
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentList> {
    let directory = std::path::absolute(&state.docs_dir)
        .unwrap_or_else(|_| state.docs_dir.clone())
        .display()
        .to_string();

    Json(DocumentList {
        documents: state.corpus().filenames.clone(),
        count: state.corpus().len(),
        directory,
    })
}

/// A bare filename: no parent references or path separators.
fn is_safe_filename(name: &str) -> bool {
    !(name.contains("..") || name.contains('/') || name.contains('\\'))
}

/// GET /download/{*filename}
///
/// The route captures the whole remaining path so traversal attempts reach
/// this check instead of falling through to a 404.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_safe_filename(&filename) {
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }

    let path = state.docs_dir.join(&filename);
    let meta = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("File not found: {}", filename);
            return Err(ApiError::NotFound(format!("File '{}' not found", filename)));
        }
        Err(e) => return Err(ApiError::Internal(format!("stat {}: {}", path.display(), e))),
    };
    if !meta.is_file() {
        return Err(ApiError::BadRequest("Invalid file".to_string()));
    }

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("open {}: {}", path.display(), e)))?;
    info!(size = meta.len(), "Downloading: {}", filename);

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, meta.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename.replace('"', "")),
            ),
        ],
        Body::from_stream(file_chunks(file)),
    ))
}

/// Read `file` in fixed-size chunks until EOF or the first error.
fn file_chunks(file: tokio::fs::File) -> impl Stream<Item = std::io::Result<Vec<u8>>> {
    stream::unfold(Some(file), |state| async move {
        let mut file = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(buf), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filenames() {
        assert!(is_safe_filename("Safety_SOP.docx"));
        assert!(is_safe_filename("notes v2.txt"));
        assert!(!is_safe_filename("../../etc/passwd"));
        assert!(!is_safe_filename("sub/file.txt"));
        assert!(!is_safe_filename("..\\secret.txt"));
        assert!(!is_safe_filename("a..b"));
    }

    #[tokio::test]
    async fn test_file_chunks_cover_whole_file() {
        use futures::StreamExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Large_SOP.txt");
        let content: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        let file = tokio::fs::File::open(&path).await.unwrap();
        let chunks: Vec<Vec<u8>> = file_chunks(file)
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= CHUNK_SIZE));
        assert_eq!(chunks.concat(), content);
    }
}
