//! The chapter processing pipeline: OCR → translate → inpaint, page by
//! page.
//!
//! Pages are processed strictly sequentially in chapter order, so
//! progress is deterministic ("page i of N") and the final element order
//! matches page order. A page failure is reported and skipped; the run
//! continues, and the model keeps whatever state the page had before the
//! failing step.

use uuid::Uuid;

use scankit_core::event_bus::{AppEvent, NotificationEvent, PipelineEvent};
use scankit_core::{ProgressCallback, ServiceError};
use scankit_model::DocumentStore;

use crate::inpaint::{self, InpaintClient};
use crate::ocr::{self, OcrClient};
use crate::translate::{self, TranslationClient};

/// The collaborator set a pipeline run talks to.
pub struct PipelineClients<'a> {
    pub ocr: &'a dyn OcrClient,
    pub translator: &'a dyn TranslationClient,
    pub inpainter: &'a dyn InpaintClient,
}

/// Outcome of a chapter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Runs detection, translation, and inpainting over every page of a
/// chapter, in page order, one page at a time.
pub async fn process_chapter(
    store: &mut DocumentStore,
    chapter_id: Uuid,
    clients: PipelineClients<'_>,
    progress: Option<ProgressCallback>,
) -> PipelineSummary {
    let Some(chapter) = store.chapter(chapter_id) else {
        tracing::debug!(%chapter_id, "process_chapter: unknown chapter");
        return PipelineSummary::default();
    };
    let (source_lang, target_lang) = match store.project_for_chapter(chapter_id) {
        Some(project) => (project.source_lang.clone(), project.target_lang.clone()),
        None => ("ja".to_string(), "en".to_string()),
    };
    let page_ids: Vec<Uuid> = chapter.pages.iter().map(|p| p.id).collect();
    let total = page_ids.len();

    store.events().publish(AppEvent::Pipeline(PipelineEvent::Started {
        chapter_id,
        total,
    }));

    let mut summary = PipelineSummary::default();
    for (i, page_id) in page_ids.into_iter().enumerate() {
        let index = i + 1;
        if let Some(report) = &progress {
            report(index, total, &format!("Processing page {index} of {total}"));
        }

        match process_page(store, page_id, &clients, &source_lang, &target_lang).await {
            Ok(()) => {
                summary.processed += 1;
                store
                    .events()
                    .publish(AppEvent::Pipeline(PipelineEvent::PageProcessed {
                        page_id,
                        index,
                        total,
                    }));
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(%page_id, error = %e, "page processing failed");
                store
                    .events()
                    .publish(AppEvent::Pipeline(PipelineEvent::PageFailed {
                        page_id,
                        index,
                        total,
                        reason: e.to_string(),
                    }));
                store
                    .events()
                    .publish(AppEvent::Notification(NotificationEvent::Warning {
                        message: format!("Page {index} failed: {e}"),
                    }));
            }
        }
    }

    store.events().publish(AppEvent::Pipeline(PipelineEvent::Finished {
        processed: summary.processed,
        failed: summary.failed,
    }));
    summary
}

/// Processes one page. Each AI call is awaited before the next begins; a
/// new run for the same page simply races the old one, last response
/// wins.
async fn process_page(
    store: &mut DocumentStore,
    page_id: Uuid,
    clients: &PipelineClients<'_>,
    source_lang: &str,
    target_lang: &str,
) -> Result<(), ServiceError> {
    let Some(page) = store.page(page_id).cloned() else {
        return Ok(());
    };
    let image_url = page.original_url.clone();

    // Detection: skipped when a previous run already populated the page.
    if !page.is_ocred {
        let detections = clients.ocr.detect_text(&image_url).await?;
        let created = ocr::apply_detections(store, page_id, &detections);
        tracing::info!(%page_id, count = created.len(), "text detection applied");
    }

    // Translation: only blocks still missing a target text are sent.
    let Some(page) = store.page(page_id).cloned() else {
        return Ok(());
    };
    let items = translate::untranslated_items(&page);
    if !items.is_empty() {
        let translations = clients
            .translator
            .translate(&items, source_lang, target_lang, Some(&image_url))
            .await?;
        let written = translate::apply_translations(store, page_id, &translations);
        tracing::info!(%page_id, written, "translations merged");
    }

    // Inpainting: masks cover every text block's rect.
    let Some(page) = store.page(page_id).cloned() else {
        return Ok(());
    };
    let masks = inpaint::mask_areas_from_page(&page);
    if !masks.is_empty() && !page.is_processed {
        let processed_url = clients.inpainter.inpaint(&image_url, &masks).await?;
        inpaint::apply_inpaint(store, page_id, processed_url);
        tracing::info!(%page_id, "inpainted page recorded");
    }

    Ok(())
}
