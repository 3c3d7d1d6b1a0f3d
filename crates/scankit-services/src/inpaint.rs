//! AI inpainting boundary: removal of original text from the artwork.
//!
//! Mask areas are derived from every text block's rect, converted from
//! page-logical units back to percentages of the page size. On success
//! the page records the cleaned image and flips `is_processed`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scankit_core::ServiceError;
use scankit_model::{DocumentStore, Page, PagePatch};

use crate::http;

/// One region to inpaint, in percentage coordinates (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Inpainting service seam.
#[async_trait]
pub trait InpaintClient: Send + Sync {
    /// Removes the masked regions from the image; returns the processed
    /// image reference.
    async fn inpaint(
        &self,
        image_url: &str,
        mask_areas: &[MaskArea],
    ) -> Result<String, ServiceError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InpaintRequest<'a> {
    image_url: &'a str,
    mask_areas: &'a [MaskArea],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InpaintResponse {
    processed_url: Option<String>,
    cleaned_url: Option<String>,
}

/// HTTP-backed inpainting client.
pub struct HttpInpaintClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpInpaintClient {
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
impl InpaintClient for HttpInpaintClient {
    async fn inpaint(
        &self,
        image_url: &str,
        mask_areas: &[MaskArea],
    ) -> Result<String, ServiceError> {
        if image_url.is_empty() {
            return Err(ServiceError::MissingField {
                field: "imageUrl".to_string(),
                service: "inpaint".to_string(),
            });
        }
        let body = http::post_json(
            &self.http,
            "inpaint",
            &self.endpoint,
            self.api_key.as_deref(),
            &InpaintRequest {
                image_url,
                mask_areas,
            },
        )
        .await?;

        let response: InpaintResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::InvalidResponse {
                service: "inpaint".to_string(),
                reason: e.to_string(),
            })?;
        response
            .processed_url
            .or(response.cleaned_url)
            .ok_or_else(|| ServiceError::InvalidResponse {
                service: "inpaint".to_string(),
                reason: "no processedUrl in response".to_string(),
            })
    }
}

/// Builds the inpainting mask from every text block's rect:
/// `pct = abs / page_dimension * 100`.
pub fn mask_areas_from_page(page: &Page) -> Vec<MaskArea> {
    if page.width <= 0.0 || page.height <= 0.0 {
        return Vec::new();
    }
    page.text_blocks()
        .map(|element| MaskArea {
            x: element.x / page.width * 100.0,
            y: element.y / page.height * 100.0,
            width: element.width / page.width * 100.0,
            height: element.height / page.height * 100.0,
        })
        .collect()
}

/// Records a successful inpainting run on the page. Last write wins when
/// responses race; there is no request correlation to discard stale ones.
pub fn apply_inpaint(store: &mut DocumentStore, page_id: Uuid, processed_url: String) -> bool {
    store.update_page(
        page_id,
        PagePatch {
            cleaned_url: Some(processed_url),
            is_processed: Some(true),
            ..PagePatch::default()
        },
    )
}
