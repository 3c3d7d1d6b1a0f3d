//! Image dimension probing for page creation.
//!
//! A page's logical size is fixed from its decoded source image at
//! upload time. When decoding fails the upload still proceeds against a
//! default logical size; the failure is logged, never raised.

use std::path::Path;

use scankit_core::constants::{DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH};

/// Reads the pixel dimensions of an image file, falling back to the
/// default logical page size when the file cannot be decoded.
pub fn probe_dimensions(path: &Path) -> (f64, f64) {
    match image::image_dimensions(path) {
        Ok((w, h)) => (w as f64, h as f64),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "image decode failed; using default page size");
            (DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT)
        }
    }
}

/// Reads pixel dimensions from an in-memory encoded image, with the same
/// fallback behavior as [`probe_dimensions`].
pub fn probe_bytes(bytes: &[u8]) -> (f64, f64) {
    match image::load_from_memory(bytes) {
        Ok(img) => (img.width() as f64, img.height() as f64),
        Err(e) => {
            tracing::warn!(error = %e, "image decode failed; using default page size");
            (DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT)
        }
    }
}
