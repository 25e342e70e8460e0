use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs as tokio_fs;
use tracing::debug;

use crate::assets::{AssetDeletion, AssetError, AssetStore};

// Segments may not start with a dot, which also rules out `..`.
static KEY_SEGMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]{0,127}$").unwrap());

/// Asset store backed by a directory, published under a public base URL.
#[derive(Clone, Debug)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Filesystem location of `key`, rejecting anything that could escape the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, AssetError> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if !KEY_SEGMENT_REGEX.is_match(segment) {
                return Err(AssetError::InvalidKey(key.to_owned()));
            }
            path.push(segment);
        }
        Ok(path)
    }

    pub async fn open(&self, key: &str) -> Result<Option<tokio_fs::File>, AssetError> {
        let path = self.path_for(key)?;
        match tokio_fs::File::open(&path).await {
            Ok(file) => Ok(Some(file)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }
}

fn io_error(key: &str, err: std::io::Error) -> AssetError {
    AssetError::Io {
        key: key.to_owned(),
        message: err.to_string(),
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AssetError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio_fs::create_dir_all(parent)
                .await
                .map_err(|err| io_error(key, err))?;
        }
        tokio_fs::write(&path, bytes)
            .await
            .map_err(|err| io_error(key, err))?;

        debug!(key = %key, content_type = %content_type, "Stored asset");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<AssetDeletion, AssetError> {
        let path = self.path_for(key)?;
        match tokio_fs::remove_file(&path).await {
            Ok(_) => Ok(AssetDeletion::Deleted),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(AssetDeletion::NotFound),
            Err(err) => Err(io_error(key, err)),
        }
    }
}
