use async_trait::async_trait;

/// Photo persistence failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("photo store failed: {message}")]
pub struct PhotoStoreError {
    /// Adapter-level detail.
    pub message: String,
}

/// Stores uploaded bootcamp photos under stable filenames.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Write `bytes` as `filename`, replacing any previous upload.
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), PhotoStoreError>;
}
