//! Request-scoped staging of uploaded images.
//!
//! Each upload request writes its files here and removes them before the
//! response goes out, on success and failure paths alike.

use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Clone)]
pub struct Staging {
    base_path: PathBuf,
}

impl Staging {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    /// Write the bytes under a fresh name and return the staged path.
    pub async fn stage(&self, data: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.base_path.join(Uuid::new_v4().to_string());
        fs::write(&path, data).await?;
        Ok(path)
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, AppError> {
        Ok(fs::read(path).await?)
    }

    /// Remove staged files. Files already gone are not an error.
    pub async fn discard(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove staged upload"
                    );
                }
            }
        }
    }
}
