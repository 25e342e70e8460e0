use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::assets::{AssetError, LocalAssetStore};
use crate::catalog::KEY_PREFIX;
use crate::error::CatalogError;
use crate::middleware::logging::to_response;

pub fn asset_router(assets: Arc<LocalAssetStore>) -> Router {
    Router::new()
        .route("/assets/products/:file", get(serve_asset))
        .layer(Extension(assets))
}

async fn serve_asset(
    Path(file): Path<String>,
    Extension(assets): Extension<Arc<LocalAssetStore>>,
) -> Response {
    let key = format!("{}{}", KEY_PREFIX, file);

    let file = match assets.open(&key).await {
        Ok(Some(file)) => file,
        Ok(None) | Err(AssetError::InvalidKey(_)) => {
            return to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "Not found"
                    })),
                ),
                Ok(()),
            );
        }
        Err(err) => return CatalogError::AssetRead(err).into_response(),
    };

    let content_type = mime_guess::from_path(&key)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    to_response((headers, body), Ok(()))
}
