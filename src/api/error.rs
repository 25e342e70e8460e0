use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::CatalogError;
use crate::middleware::logging::to_response;

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, body) = match &self {
            CatalogError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "kind": kind,
                    "fields": fields
                }),
            ),
            CatalogError::UnsupportedMedia(_)
            | CatalogError::PayloadTooLarge { .. }
            | CatalogError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.to_string(),
                    "kind": kind
                }),
            ),
            CatalogError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": self.to_string(),
                    "kind": kind
                }),
            ),
            CatalogError::AssetUpload(_)
            | CatalogError::AssetDelete(_)
            | CatalogError::AssetRead(_)
            | CatalogError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Internal server error",
                    "kind": kind
                }),
            ),
        };

        to_response((status, Json(body)), Err(self))
    }
}
