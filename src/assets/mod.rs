mod local;

pub use local::LocalAssetStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum AssetError {
    #[error("Invalid asset key: {0}")]
    InvalidKey(String),
    #[error("I/O error on {key}: {message}")]
    Io { key: String, message: String },
    #[error("Asset store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetDeletion {
    Deleted,
    NotFound,
}

/// Object storage holding product photos. Every stored object is publicly
/// readable at the URL returned by `put`.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, AssetError>;

    async fn delete(&self, key: &str) -> Result<AssetDeletion, AssetError>;
}
