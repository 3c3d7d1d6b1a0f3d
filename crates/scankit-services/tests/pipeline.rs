//! Chapter pipeline behavior with stub collaborators: sequential
//! ordering, deterministic progress, per-page failure isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scankit_core::event_bus::{AppEvent, EventFilter, PipelineEvent};
use scankit_core::ServiceError;
use scankit_model::DocumentStore;
use scankit_services::{
    process_chapter, InpaintClient, MaskArea, OcrClient, OcrDetection, PipelineClients,
    TranslationClient, TranslationItem, TranslationResult,
};
use uuid::Uuid;

struct StubOcr {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

#[async_trait]
impl OcrClient for StubOcr {
    async fn detect_text(&self, _image_url: &str) -> Result<Vec<OcrDetection>, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(ServiceError::RequestFailed {
                service: "ocr".to_string(),
                reason: "boom".to_string(),
            });
        }
        Ok(vec![OcrDetection {
            text: format!("line {call}"),
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 5.0,
            rotation: 0.0,
            confidence: 0.9,
        }])
    }
}

struct StubTranslator;

#[async_trait]
impl TranslationClient for StubTranslator {
    async fn translate(
        &self,
        items: &[TranslationItem],
        _source_lang: &str,
        _target_lang: &str,
        _image_url: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ServiceError> {
        Ok(items
            .iter()
            .map(|item| TranslationResult {
                id: item.id.clone(),
                translation: format!("[en] {}", item.text),
            })
            .collect())
    }
}

struct StubInpainter;

#[async_trait]
impl InpaintClient for StubInpainter {
    async fn inpaint(
        &self,
        image_url: &str,
        _mask_areas: &[MaskArea],
    ) -> Result<String, ServiceError> {
        Ok(format!("{image_url}.clean"))
    }
}

fn store_with_chapter(pages: usize) -> (DocumentStore, Uuid) {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    for i in 1..=pages {
        store
            .add_page(chapter_id, format!("pages/{i:03}.png"), 800.0, 1200.0)
            .unwrap();
    }
    (store, chapter_id)
}

#[tokio::test]
async fn pipeline_processes_pages_in_order() {
    let (mut store, chapter_id) = store_with_chapter(3);
    let ocr = StubOcr { calls: AtomicUsize::new(0), fail_on_call: None };

    let progress_log = Arc::new(Mutex::new(Vec::new()));
    let log = progress_log.clone();

    let summary = process_chapter(
        &mut store,
        chapter_id,
        PipelineClients {
            ocr: &ocr,
            translator: &StubTranslator,
            inpainter: &StubInpainter,
        },
        Some(Arc::new(move |i, n, _msg| {
            log.lock().unwrap().push((i, n));
        })),
    )
    .await;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 0);
    // Strictly sequential, "item i of N".
    assert_eq!(*progress_log.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);

    let chapter = store.chapter(chapter_id).unwrap().clone();
    for page in &chapter.pages {
        assert!(page.is_ocred);
        assert!(page.is_processed);
        assert_eq!(
            page.cleaned_url.as_deref(),
            Some(format!("{}.clean", page.original_url).as_str())
        );
        assert_eq!(page.elements.len(), 1);
        let block = page.elements[0].as_text().unwrap();
        assert!(block.target_text.starts_with("[en] line"));
    }
}

#[tokio::test]
async fn a_failing_page_is_skipped_and_reported() {
    let (mut store, chapter_id) = store_with_chapter(3);
    let ocr = StubOcr { calls: AtomicUsize::new(0), fail_on_call: Some(2) };

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    store.events().subscribe(EventFilter::All, move |event| {
        if let AppEvent::Pipeline(e) = event {
            sink.lock().unwrap().push(e);
        }
    });

    let summary = process_chapter(
        &mut store,
        chapter_id,
        PipelineClients {
            ocr: &ocr,
            translator: &StubTranslator,
            inpainter: &StubInpainter,
        },
        None,
    )
    .await;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);

    // The failed page kept its prior state: no detections applied.
    let chapter = store.chapter(chapter_id).unwrap().clone();
    let failed_page = &chapter.pages[1];
    assert!(!failed_page.is_ocred);
    assert!(failed_page.elements.is_empty());
    // Neighbors were unaffected.
    assert!(chapter.pages[0].is_ocred);
    assert!(chapter.pages[2].is_ocred);

    let events = events.lock().unwrap();
    assert!(matches!(events.first(), Some(PipelineEvent::Started { total: 3, .. })));
    assert!(events.iter().any(|e| matches!(e, PipelineEvent::PageFailed { index: 2, .. })));
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Finished { processed: 2, failed: 1 })
    ));
}

#[tokio::test]
async fn rerunning_skips_ocr_and_keeps_manual_translations() {
    let (mut store, chapter_id) = store_with_chapter(1);
    let ocr = StubOcr { calls: AtomicUsize::new(0), fail_on_call: None };
    let clients = PipelineClients {
        ocr: &ocr,
        translator: &StubTranslator,
        inpainter: &StubInpainter,
    };
    process_chapter(&mut store, chapter_id, clients, None).await;
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);

    // Second run: the page is already OCRed and translated, so neither
    // the OCR call nor any overwrite of targets happens.
    let page_id = store.chapter(chapter_id).unwrap().pages[0].id;
    let element_id = store.page(page_id).unwrap().elements[0].id;
    let before = store
        .page(page_id)
        .unwrap()
        .element(element_id)
        .unwrap()
        .as_text()
        .unwrap()
        .target_text
        .clone();

    let clients = PipelineClients {
        ocr: &ocr,
        translator: &StubTranslator,
        inpainter: &StubInpainter,
    };
    process_chapter(&mut store, chapter_id, clients, None).await;
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        store
            .page(page_id)
            .unwrap()
            .element(element_id)
            .unwrap()
            .as_text()
            .unwrap()
            .target_text,
        before
    );
}
