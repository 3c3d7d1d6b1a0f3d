//! Error handling for ScanKit
//!
//! Provides structured error types for the collaborator and export layers:
//! - Service errors (OCR / translation / inpainting / persistence calls)
//! - Export errors (decode, rasterization, packaging)
//!
//! The document model itself never raises errors: mutations against unknown
//! ids are quiet no-ops reported through their `bool` return value. All
//! error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Collaborator service error type
///
/// Represents failures at the boundary to the AI and persistence
/// collaborators. None of these are fatal to an editing session; callers
/// catch them at the call site and surface a notification.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// A required request field was missing; rejected before any mutation
    #[error("Missing required field '{field}' for {service} request")]
    MissingField {
        /// The name of the missing field.
        field: String,
        /// The service the request was addressed to.
        service: String,
    },

    /// The collaborator request failed (network, timeout, non-2xx status)
    #[error("{service} request failed: {reason}")]
    RequestFailed {
        /// The service that failed.
        service: String,
        /// The reason the request failed.
        reason: String,
    },

    /// The collaborator returned a response that cannot be interpreted
    #[error("Invalid {service} response: {reason}")]
    InvalidResponse {
        /// The service that produced the response.
        service: String,
        /// The reason the response is invalid.
        reason: String,
    },

    /// Failed to construct the HTTP client
    #[error("HTTP client error: {reason}")]
    ClientBuild {
        /// The reason the client could not be built.
        reason: String,
    },
}

/// Export error type
///
/// Represents failures while flattening pages to raster images and
/// packaging them for download.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A source or cleaned image could not be decoded
    #[error("Failed to decode image '{url}': {reason}")]
    ImageDecode {
        /// The image reference that failed to decode.
        url: String,
        /// The decoder error.
        reason: String,
    },

    /// The rendered page could not be encoded
    #[error("Failed to encode page image: {reason}")]
    ImageEncode {
        /// The encoder error.
        reason: String,
    },

    /// A raster surface of the requested size could not be allocated
    #[error("Cannot allocate {width}x{height} raster surface")]
    InvalidSurface {
        /// Requested surface width in pixels.
        width: u32,
        /// Requested surface height in pixels.
        height: u32,
    },

    /// Archive packaging failed
    #[error("Failed to write archive: {reason}")]
    Archive {
        /// The archiver error.
        reason: String,
    },
}

/// Main error type for ScanKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Collaborator service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a collaborator service error
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::MissingField {
            field: "imageUrl".to_string(),
            service: "ocr".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required field 'imageUrl' for ocr request"
        );

        let err = ServiceError::RequestFailed {
            service: "translate".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "translate request failed: timeout");
    }

    #[test]
    fn test_error_classification() {
        let err: Error = ServiceError::ClientBuild {
            reason: "tls".to_string(),
        }
        .into();
        assert!(err.is_service_error());
        assert!(!err.is_export_error());
    }
}
