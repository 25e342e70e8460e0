use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::CatalogError;

/// Maximum accepted image size unless configured otherwise: 5 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Every key this catalog creates lives under this prefix.
pub const KEY_PREFIX: &str = "products/";

static UNSAFE_FILE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// An image attached to a create or update request.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub(crate) fn check(&self, max_bytes: usize) -> Result<(), CatalogError> {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !essence.starts_with("image/") || essence.len() == "image/".len() {
            return Err(CatalogError::UnsupportedMedia(format!(
                "Only image uploads are accepted, got '{}'",
                self.content_type
            )));
        }
        if self.bytes.len() > max_bytes {
            return Err(CatalogError::PayloadTooLarge {
                size: self.bytes.len(),
                limit: max_bytes,
            });
        }
        Ok(())
    }

    /// A fresh key for this upload: `products/<uuid>-<file name>`.
    pub(crate) fn fresh_key(&self) -> String {
        format!(
            "{}{}-{}",
            KEY_PREFIX,
            Uuid::new_v4().simple(),
            self.safe_file_name()
        )
    }

    fn safe_file_name(&self) -> String {
        let base = self.file_name.rsplit(['/', '\\']).next().unwrap_or_default();
        let mut name = UNSAFE_FILE_CHARS
            .replace_all(base, "_")
            .trim_start_matches('.')
            .to_owned();
        if name.is_empty() {
            name = "image".to_owned();
        }
        if !name.contains('.') {
            if let Some(ext) = mime_guess::get_mime_extensions_str(&self.content_type)
                .and_then(|exts| exts.first())
            {
                name = format!("{}.{}", name, ext);
            }
        }
        name
    }
}

/// Recovers the asset key from a public asset URL: the URL path starting at
/// the `products/` segment.
pub fn asset_key_from_url(url: &str) -> Option<String> {
    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let path = match without_scheme.find('/') {
        Some(idx) => &without_scheme[idx..],
        None => return None,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let segment = format!("/{}", KEY_PREFIX);
    path.find(&segment)
        .map(|idx| path[idx + 1..].to_owned())
        .filter(|key| key.len() > KEY_PREFIX.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: &str, len: usize) -> ImageUpload {
        ImageUpload::new(name, content_type, vec![0u8; len])
    }

    #[test]
    fn accepts_images_within_limit() {
        assert!(upload("a.png", "image/png", 10).check(10).is_ok());
        assert!(upload("a.jpg", "image/jpeg; charset=binary", 1).check(10).is_ok());
    }

    #[test]
    fn rejects_non_images() {
        let err = upload("notes.txt", "text/plain", 1).check(10).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedMedia(_)));
    }

    #[test]
    fn rejects_oversized_images() {
        let err = upload("big.png", "image/png", 11).check(10).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::PayloadTooLarge { size: 11, limit: 10 }
        ));
    }

    #[test]
    fn keys_are_unique_and_sanitized() {
        let image = upload("../My Photo (1).JPG", "image/jpeg", 1);
        let first = image.fresh_key();
        let second = image.fresh_key();
        assert_ne!(first, second);
        assert!(first.starts_with("products/"));
        assert!(first.ends_with("-My_Photo_1_.JPG"));
    }

    #[test]
    fn missing_extension_comes_from_content_type() {
        let key = upload("snapshot", "image/png", 1).fresh_key();
        assert!(key.ends_with("-snapshot.png"));
    }

    #[test]
    fn key_from_url() {
        assert_eq!(
            asset_key_from_url("https://bucket.s3.ap-south-1.amazonaws.com/products/abc-tea.png"),
            Some("products/abc-tea.png".to_owned())
        );
        assert_eq!(
            asset_key_from_url("http://localhost:3000/assets/products/abc-tea.png?v=2"),
            Some("products/abc-tea.png".to_owned())
        );
        assert_eq!(asset_key_from_url("http://products/"), None);
        assert_eq!(asset_key_from_url(""), None);
    }
}
