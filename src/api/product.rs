use axum::{
    extract::{DefaultBodyLimit, Extension, Multipart, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{ImageUpload, ProductCatalog, ProductFields};
use crate::error::CatalogError;
use crate::middleware::logging::to_response;

/// Name of the multipart part carrying the product photo.
pub const IMAGE_FIELD: &str = "image";

// Room for the text fields and multipart framing around a maximum size image.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

//ROUTERS
pub fn product_router(catalog: Arc<ProductCatalog>) -> Router {
    let body_limit = catalog.max_image_bytes() * 2 + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/:id",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(catalog))
}

//ROUTES
async fn create_product(
    Extension(catalog): Extension<Arc<ProductCatalog>>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let (fields, image) = read_product_form(multipart).await?;
    let created = catalog.create(fields, image).await?;

    Ok(to_response((StatusCode::CREATED, Json(created)), Ok(())))
}

async fn list_products(
    Extension(catalog): Extension<Arc<ProductCatalog>>,
) -> Result<Response, CatalogError> {
    let products = catalog.list().await?;

    Ok(to_response((StatusCode::OK, Json(products)), Ok(())))
}

async fn get_product(
    Path(id): Path<i32>,
    Extension(catalog): Extension<Arc<ProductCatalog>>,
) -> Result<Response, CatalogError> {
    let product = catalog.get(id).await?;

    Ok(to_response((StatusCode::OK, Json(product)), Ok(())))
}

async fn update_product(
    Path(id): Path<i32>,
    Extension(catalog): Extension<Arc<ProductCatalog>>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let (fields, image) = read_product_form(multipart).await?;
    let updated = catalog.update(id, fields, image).await?;

    Ok(to_response((StatusCode::OK, Json(updated)), Ok(())))
}

async fn delete_product(
    Path(id): Path<i32>,
    Extension(catalog): Extension<Arc<ProductCatalog>>,
) -> Result<Response, CatalogError> {
    let deleted = catalog.delete(id).await?;

    Ok(to_response((StatusCode::OK, Json(deleted)), Ok(())))
}

//utils
async fn read_product_form(
    mut multipart: Multipart,
) -> Result<(ProductFields, Option<ImageUpload>), CatalogError> {
    let mut fields = ProductFields::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| CatalogError::BadRequest(format!("Multipart error: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let data = field
                .bytes()
                .await
                .map_err(|err| CatalogError::BadRequest(format!("Failed to read file bytes: {err}")))?;

            // browsers send an empty part when no file was picked
            if data.is_empty() && file_name.is_empty() {
                continue;
            }
            if image.is_some() {
                return Err(CatalogError::BadRequest(
                    "Only one image may be attached.".to_owned(),
                ));
            }
            image = Some(ImageUpload::new(file_name, content_type, data.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| CatalogError::BadRequest(format!("Failed to read field {name}: {err}")))?;

        match name.as_str() {
            "itemName" => fields.item_name = Some(value),
            "sellPrice" => fields.sell_price = parse_price(&value),
            "type" => fields.product_type = Some(value),
            "primaryUnit" => fields.primary_unit = Some(value),
            "customUnit" => fields.custom_unit = Some(value),
            "gstEnabled" => fields.gst_enabled = Some(value),
            _ => debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok((fields, image))
}

/// Blank means "not provided"; anything unparsable becomes NaN so that
/// validation reports it against `sellPrice`.
fn parse_price(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.parse::<f64>().unwrap_or(f64::NAN))
}
