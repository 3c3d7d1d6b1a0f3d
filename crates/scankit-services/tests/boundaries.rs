//! Collaborator boundary behavior: percentage conversion, response parse
//! degradation, translation merge, mask derivation.

use scankit_model::{DocumentStore, ElementPatch};
use scankit_services::{
    inpaint, ocr, translate, OcrDetection, TranslationResult,
};
use uuid::Uuid;

fn store_with_page() -> (DocumentStore, Uuid) {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    let page_id = store.add_page(chapter_id, "pages/001.png", 800.0, 1200.0).unwrap();
    (store, page_id)
}

#[test]
fn detection_percentages_convert_to_page_units() {
    let (store, page_id) = store_with_page();
    let page = store.page(page_id).unwrap();

    let detections = vec![OcrDetection {
        text: "ドン".to_string(),
        x: 10.0,
        y: 20.0,
        width: 15.0,
        height: 8.0,
        rotation: 0.0,
        confidence: 0.95,
    }];
    let elements = ocr::detections_to_elements(page, &detections);

    assert_eq!(elements.len(), 1);
    let el = &elements[0];
    let approx = |a: f64, b: f64| (a - b).abs() < 1e-9;
    assert!(approx(el.x, 80.0) && approx(el.y, 240.0), "rect = {:?}", (el.x, el.y));
    assert!(
        approx(el.width, 120.0) && approx(el.height, 96.0),
        "size = {:?}",
        (el.width, el.height)
    );
    assert_eq!(el.as_text().unwrap().source_text, "ドン");
    assert_eq!(el.as_text().unwrap().confidence, 0.95);
}

#[test]
fn apply_detections_marks_the_page_ocred() {
    let (mut store, page_id) = store_with_page();

    let ids = ocr::apply_detections(
        &mut store,
        page_id,
        &[
            OcrDetection {
                text: "one".to_string(),
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 5.0,
                rotation: 0.0,
                confidence: 0.5,
            },
            OcrDetection {
                text: "two".to_string(),
                x: 50.0,
                y: 50.0,
                width: 10.0,
                height: 5.0,
                rotation: 12.0,
                confidence: 0.9,
            },
        ],
    );
    assert_eq!(ids.len(), 2);

    let page = store.page(page_id).unwrap();
    assert!(page.is_ocred);
    assert_eq!(page.elements.len(), 2);
    // Detection order is element order is paint order.
    assert_eq!(
        page.elements_in_paint_order().iter().map(|e| e.id).collect::<Vec<_>>(),
        ids
    );

    // An empty re-run still counts as a run.
    let (mut store2, page2) = store_with_page();
    ocr::apply_detections(&mut store2, page2, &[]);
    assert!(store2.page(page2).unwrap().is_ocred);
}

#[test]
fn ocr_parse_accepts_envelope_prose_and_garbage() {
    // Structured envelope.
    let parsed = ocr::parse_detections(
        r#"{"detections":[{"text":"a","x":1,"y":2,"width":3,"height":4,"rotation":0,"confidence":0.5}]}"#,
    );
    assert_eq!(parsed.len(), 1);

    // Bare array wrapped in model prose and markdown fences.
    let parsed = ocr::parse_detections(
        "Here you go:\n```json\n[{\"text\":\"b\",\"x\":1,\"y\":2,\"width\":3,\"height\":4}]\n```\nDone!",
    );
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].text, "b");

    // Unparseable content degrades to empty, not an error.
    assert!(ocr::parse_detections("the page contains no machine-readable text").is_empty());
    assert!(ocr::parse_detections("[{broken json").is_empty());
}

#[test]
fn ocr_parse_drops_invalid_detections() {
    let parsed = ocr::parse_detections(
        r#"[
            {"text":"ok","x":1,"y":2,"width":3,"height":4,"confidence":7.5},
            {"text":"","x":1,"y":2,"width":3,"height":4},
            {"text":"flat","x":1,"y":2,"width":0,"height":4}
        ]"#,
    );
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].text, "ok");
    // Out-of-range confidence is clamped.
    assert_eq!(parsed[0].confidence, 1.0);
}

#[test]
fn translations_merge_only_into_empty_targets() {
    let (mut store, page_id) = store_with_page();
    let a = store.add_text_block(page_id, "ichi", 0.0, 0.0, 50.0, 20.0).unwrap();
    let b = store.add_text_block(page_id, "ni", 0.0, 30.0, 50.0, 20.0).unwrap();
    store.update_element(page_id, b, ElementPatch::target_text("existing"));

    let written = translate::apply_translations(
        &mut store,
        page_id,
        &[
            TranslationResult { id: a.to_string(), translation: "hello".to_string() },
            TranslationResult { id: b.to_string(), translation: "ignored".to_string() },
            TranslationResult { id: Uuid::new_v4().to_string(), translation: "orphan".to_string() },
            TranslationResult { id: "not-a-uuid".to_string(), translation: "bad".to_string() },
        ],
    );
    assert_eq!(written, 1);

    let page = store.page(page_id).unwrap();
    assert_eq!(page.element(a).unwrap().as_text().unwrap().target_text, "hello");
    assert_eq!(page.element(b).unwrap().as_text().unwrap().target_text, "existing");
}

#[test]
fn untranslated_items_skip_filled_targets() {
    let (mut store, page_id) = store_with_page();
    let a = store.add_text_block(page_id, "ichi", 0.0, 0.0, 50.0, 20.0).unwrap();
    let b = store.add_text_block(page_id, "ni", 0.0, 30.0, 50.0, 20.0).unwrap();
    store.update_element(page_id, b, ElementPatch::target_text("two"));

    let items = translate::untranslated_items(store.page(page_id).unwrap());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, a.to_string());
    assert_eq!(items[0].text, "ichi");
}

#[test]
fn mask_areas_cover_every_text_block_in_percent() {
    let (mut store, page_id) = store_with_page();
    store.add_text_block(page_id, "a", 80.0, 240.0, 120.0, 96.0).unwrap();
    store.add_text_block(page_id, "b", 0.0, 0.0, 400.0, 600.0).unwrap();
    store
        .add_shape(page_id, scankit_model::ShapeKind::Rect, 0.0, 0.0, 10.0, 10.0)
        .unwrap();

    let masks = inpaint::mask_areas_from_page(store.page(page_id).unwrap());
    // Shapes don't contribute masks.
    assert_eq!(masks.len(), 2);
    let approx = |a: f64, b: f64| (a - b).abs() < 1e-9;
    assert!(approx(masks[0].x, 10.0) && approx(masks[0].y, 20.0));
    assert!(approx(masks[0].width, 15.0) && approx(masks[0].height, 8.0));
    assert!(approx(masks[1].x, 0.0) && approx(masks[1].y, 0.0));
    assert!(approx(masks[1].width, 50.0) && approx(masks[1].height, 50.0));
}

#[test]
fn apply_inpaint_records_the_cleaned_page() {
    let (mut store, page_id) = store_with_page();
    assert!(inpaint::apply_inpaint(&mut store, page_id, "pages/001_clean.png".to_string()));

    let page = store.page(page_id).unwrap();
    assert!(page.is_processed);
    assert_eq!(page.cleaned_url.as_deref(), Some("pages/001_clean.png"));

    // Races are last-write-wins by design.
    inpaint::apply_inpaint(&mut store, page_id, "pages/001_clean_v2.png".to_string());
    assert_eq!(
        store.page(page_id).unwrap().cleaned_url.as_deref(),
        Some("pages/001_clean_v2.png")
    );
}
