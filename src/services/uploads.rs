//! Multipart upload staging.
//!
//! Uploaded sample files are written to a local directory that the compute
//! backend can read from; the proxy then forwards the staged path plus the
//! client's original filename. Files are staged under generated names so
//! concurrent uploads never collide, and they are not cleaned up here —
//! the compute backend's cache lifecycle owns them once forwarded.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid multipart payload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// One staged upload: where it landed on disk and what the client called it.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Absolute path in the uploads directory.
    pub path: PathBuf,
    /// Client-supplied filename, forwarded verbatim.
    pub original_name: String,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the uploads directory if missing and resolve it to an absolute
    /// path, so every staged file path handed to the compute backend is
    /// absolute no matter where the service was started from.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, UploadError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let dir = fs::canonicalize(dir).await?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Drain a multipart form and stage every uploaded file, in wire order.
    ///
    /// The dashboard sends files under `file` (single-file picker) or `files`
    /// (multi-select); both are accepted and consolidated. Parts under any
    /// other name, and parts without a filename (plain text fields), are
    /// skipped. An empty result is valid here; the upload handler decides
    /// whether that is an error.
    pub async fn stage_multipart(
        &self,
        mut multipart: Multipart,
    ) -> Result<Vec<StagedFile>, UploadError> {
        let mut staged = Vec::new();

        while let Some(mut field) = multipart.next_field().await? {
            if !matches!(field.name(), Some("file" | "files")) {
                continue;
            }

            let Some(original_name) = field.file_name().map(str::to_owned) else {
                continue;
            };

            // 32-hex generated name; uniqueness is what allows concurrent
            // uploads to share the directory without coordination.
            let path = self.dir.join(Uuid::new_v4().simple().to_string());

            let mut file = fs::File::create(&path).await?;
            while let Some(chunk) = field.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;

            tracing::debug!(
                staged = %path.display(),
                original = %original_name,
                "staged uploaded file"
            );

            staged.push(StagedFile {
                path,
                original_name,
            });
        }

        Ok(staged)
    }
}
