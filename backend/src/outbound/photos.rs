//! Filesystem photo storage.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ports::{PhotoStore, PhotoStoreError};

/// Stores uploads as files under a single directory, created on demand.
pub struct LocalPhotoStore {
    dir: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| PhotoStoreError {
                message: format!("creating {}: {err}", self.dir.display()),
            })?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| PhotoStoreError {
                message: format!("writing {}: {err}", path.display()),
            })?;
        Ok(())
    }
}
