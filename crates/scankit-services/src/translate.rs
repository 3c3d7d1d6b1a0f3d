//! AI translation boundary: batch translation of detected text.
//!
//! The merge rule is strict: a bulk translate pass writes only into
//! elements whose target text is still empty. A translator's manual edit
//! is never overwritten by a later batch response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scankit_core::ServiceError;
use scankit_model::{DocumentStore, ElementPatch, Page};

use crate::http;

/// One source string to translate, keyed by its element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationItem {
    pub id: String,
    pub text: String,
}

/// One translated string, keyed back to its element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub id: String,
    pub translation: String,
}

/// Translation service seam.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    /// Translates a batch of strings; `image_url` optionally provides the
    /// page image for visual context.
    async fn translate(
        &self,
        items: &[TranslationItem],
        source_lang: &str,
        target_lang: &str,
        image_url: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ServiceError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    texts: &'a [TranslationItem],
    source_lang: &'a str,
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<TranslationResult>,
}

/// HTTP-backed translation client.
pub struct HttpTranslationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslationClient {
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
impl TranslationClient for HttpTranslationClient {
    async fn translate(
        &self,
        items: &[TranslationItem],
        source_lang: &str,
        target_lang: &str,
        image_url: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ServiceError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        if source_lang.is_empty() || target_lang.is_empty() {
            return Err(ServiceError::MissingField {
                field: "sourceLang/targetLang".to_string(),
                service: "translate".to_string(),
            });
        }
        let body = http::post_json(
            &self.http,
            "translate",
            &self.endpoint,
            self.api_key.as_deref(),
            &TranslateRequest {
                texts: items,
                source_lang,
                target_lang,
                image_url,
            },
        )
        .await?;

        // A malformed body degrades to "no translations" rather than
        // failing the page.
        match serde_json::from_str::<TranslateResponse>(&body) {
            Ok(response) => Ok(response.translations),
            Err(e) => {
                tracing::warn!(error = %e, "unparseable translation response");
                Ok(Vec::new())
            }
        }
    }
}

/// Collects the source strings of all text blocks still awaiting a
/// translation.
pub fn untranslated_items(page: &Page) -> Vec<TranslationItem> {
    page.text_blocks()
        .filter_map(|element| {
            let block = element.as_text()?;
            block.target_text.is_empty().then(|| TranslationItem {
                id: element.id.to_string(),
                text: block.source_text.clone(),
            })
        })
        .collect()
}

/// Merges a translation response into a page. Only elements whose target
/// text is empty receive their translation; ids that don't resolve are
/// skipped. Returns the number of elements written.
pub fn apply_translations(
    store: &mut DocumentStore,
    page_id: Uuid,
    translations: &[TranslationResult],
) -> usize {
    let Some(page) = store.page(page_id).cloned() else {
        tracing::debug!(%page_id, "apply_translations: unknown page");
        return 0;
    };

    let mut written = 0;
    for result in translations {
        let Ok(element_id) = result.id.parse::<Uuid>() else {
            tracing::debug!(id = %result.id, "apply_translations: unparseable id");
            continue;
        };
        let Some(element) = page.element(element_id) else {
            continue;
        };
        let Some(block) = element.as_text() else {
            continue;
        };
        if !block.target_text.is_empty() {
            continue;
        }
        if store.update_element(
            page_id,
            element_id,
            ElementPatch::target_text(result.translation.clone()),
        ) {
            written += 1;
        }
    }
    written
}
