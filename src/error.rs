use serde::Serialize;
use thiserror::Error;

use crate::assets::AssetError;
use crate::store::StoreError;

/// A single rejected input field, named as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),
    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),
    #[error("Image of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },
    #[error("No product with {0} id was found.")]
    NotFound(i32),
    #[error("Failed to upload asset: {0}")]
    AssetUpload(AssetError),
    #[error("Failed to delete asset: {0}")]
    AssetDelete(AssetError),
    #[error("Failed to read asset: {0}")]
    AssetRead(AssetError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::UnsupportedMedia(_) => "unsupported_media",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::NotFound(_) => "not_found",
            Self::AssetUpload(_) => "asset_upload_error",
            Self::AssetDelete(_) => "asset_delete_error",
            Self::AssetRead(_) => "asset_read_error",
            Self::Store(_) => "store_error",
            Self::BadRequest(_) => "bad_request",
        }
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}
