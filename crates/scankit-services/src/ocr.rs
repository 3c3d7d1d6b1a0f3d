//! AI OCR boundary: text detection on a page image.
//!
//! The wire contract is percentage-based: every box is expressed as
//! percentages of the image dimensions (0-100), converted to absolute
//! page-logical units against the page's stored size before any element
//! is constructed. Responses that fail to parse degrade to an empty
//! detection list rather than erroring.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scankit_core::ServiceError;
use scankit_model::{CanvasElement, DocumentStore, ElementKind, Page, PagePatch};

use crate::http;

/// One detected text region, in percentage coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDetection {
    pub text: String,
    /// Left edge as a percentage of image width (0-100).
    pub x: f64,
    /// Top edge as a percentage of image height (0-100).
    pub y: f64,
    /// Width as a percentage of image width (0-100).
    pub width: f64,
    /// Height as a percentage of image height (0-100).
    pub height: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Detection confidence in [0, 1].
    #[serde(default)]
    pub confidence: f64,
}

/// Text detection service seam.
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Detects text regions on the given image.
    async fn detect_text(&self, image_url: &str) -> Result<Vec<OcrDetection>, ServiceError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OcrRequest<'a> {
    image_url: &'a str,
}

#[derive(Deserialize)]
struct OcrResponse {
    #[serde(default)]
    detections: Vec<OcrDetection>,
}

/// HTTP-backed OCR client.
pub struct HttpOcrClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpOcrClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http::build_client(timeout_secs)?,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl OcrClient for HttpOcrClient {
    async fn detect_text(&self, image_url: &str) -> Result<Vec<OcrDetection>, ServiceError> {
        if image_url.is_empty() {
            return Err(ServiceError::MissingField {
                field: "imageUrl".to_string(),
                service: "ocr".to_string(),
            });
        }
        let body = http::post_json(
            &self.http,
            "ocr",
            &self.endpoint,
            self.api_key.as_deref(),
            &OcrRequest { image_url },
        )
        .await?;
        Ok(parse_detections(&body))
    }
}

/// Parses a detection list out of a service response. Accepts either the
/// structured `{"detections": [...]}` envelope or a bare JSON array
/// embedded in surrounding prose (models love markdown fences). Anything
/// unparseable degrades to an empty list.
pub fn parse_detections(body: &str) -> Vec<OcrDetection> {
    if let Ok(response) = serde_json::from_str::<OcrResponse>(body) {
        return sanitize(response.detections);
    }
    if let Some(array) = extract_json_array(body) {
        if let Ok(detections) = serde_json::from_str::<Vec<OcrDetection>>(array) {
            return sanitize(detections);
        }
    }
    tracing::warn!("unparseable OCR response; treating as no detections");
    Vec::new()
}

/// Finds the outermost `[...]` span in a blob of prose.
fn extract_json_array(body: &str) -> Option<&str> {
    let start = body.find('[')?;
    let end = body.rfind(']')?;
    (end > start).then(|| &body[start..=end])
}

/// Drops detections with empty text or degenerate geometry and clamps
/// confidence into [0, 1].
fn sanitize(detections: Vec<OcrDetection>) -> Vec<OcrDetection> {
    detections
        .into_iter()
        .filter(|d| {
            !d.text.trim().is_empty()
                && d.x.is_finite()
                && d.y.is_finite()
                && d.width.is_finite()
                && d.height.is_finite()
                && d.width > 0.0
                && d.height > 0.0
        })
        .map(|mut d| {
            d.confidence = if d.confidence.is_finite() {
                d.confidence.clamp(0.0, 1.0)
            } else {
                0.0
            };
            d
        })
        .collect()
}

/// Converts percentage-space detections into text elements in the page's
/// logical units: `abs = pct / 100 * page_dimension`.
pub fn detections_to_elements(page: &Page, detections: &[OcrDetection]) -> Vec<CanvasElement> {
    detections
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let mut element = CanvasElement::text(
                d.text.clone(),
                d.x / 100.0 * page.width,
                d.y / 100.0 * page.height,
                d.width / 100.0 * page.width,
                d.height / 100.0 * page.height,
            );
            element.rotation = d.rotation;
            element.name = format!("Text {}", i + 1);
            if let ElementKind::Text(block) = &mut element.kind {
                block.confidence = d.confidence;
            }
            element
        })
        .collect()
}

/// Appends a detection run's text blocks to a page and marks it OCRed.
/// A run with zero detections still marks the page. Returns the created
/// element ids.
pub fn apply_detections(
    store: &mut DocumentStore,
    page_id: Uuid,
    detections: &[OcrDetection],
) -> Vec<Uuid> {
    let Some(page) = store.page(page_id).cloned() else {
        tracing::debug!(%page_id, "apply_detections: unknown page");
        return Vec::new();
    };
    let ids = detections_to_elements(&page, detections)
        .into_iter()
        .filter_map(|element| store.add_element(page_id, element))
        .collect();
    store.update_page(
        page_id,
        PagePatch {
            is_ocred: Some(true),
            ..PagePatch::default()
        },
    );
    ids
}
