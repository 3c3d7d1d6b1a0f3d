//! Document tree behavior: CRUD with cascades, page reordering with
//! renumbering, snapshot sharing, selection rules, and lock semantics.

use std::sync::Arc;

use scankit_model::{
    ChapterPatch, DocumentStore, ElementPatch, PagePatch, ProjectPatch, SelectionOrigin,
};
use scankit_core::event_bus::{AppEvent, EventFilter, SelectionEvent};
use uuid::Uuid;

fn page_numbers(store: &DocumentStore, chapter_id: Uuid) -> Vec<u32> {
    store
        .chapter(chapter_id)
        .unwrap()
        .pages
        .iter()
        .map(|p| p.page_number)
        .collect()
}

fn page_ids(store: &DocumentStore, chapter_id: Uuid) -> Vec<Uuid> {
    store
        .chapter(chapter_id)
        .unwrap()
        .pages
        .iter()
        .map(|p| p.id)
        .collect()
}

#[test]
fn project_chapter_page_crud_and_cascade() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    let page_id = store.add_page(chapter_id, "pages/001.png", 800.0, 1200.0).unwrap();

    assert!(store.update_project(
        project_id,
        ProjectPatch {
            description: Some("Fan translation".to_string()),
            ..ProjectPatch::default()
        },
    ));
    assert!(store.update_chapter(
        chapter_id,
        ChapterPatch {
            title: Some("Prologue".to_string()),
        },
    ));
    assert_eq!(store.chapter(chapter_id).unwrap().title, "Prologue");

    assert!(store.update_page(
        page_id,
        PagePatch {
            cleaned_url: Some("pages/001_clean.png".to_string()),
            is_processed: Some(true),
            ..PagePatch::default()
        },
    ));
    let page = store.page(page_id).unwrap();
    assert!(page.is_processed);
    assert_eq!(page.cleaned_url.as_deref(), Some("pages/001_clean.png"));

    // Deleting the project takes the chapter and page with it.
    assert!(store.delete_project(project_id));
    assert!(store.project(project_id).is_none());
    assert!(store.chapter(chapter_id).is_none());
    assert!(store.page(page_id).is_none());
}

#[test]
fn move_page_renumbers_and_round_trips() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    for i in 1..=4 {
        store
            .add_page(chapter_id, format!("pages/{i:03}.png"), 800.0, 1200.0)
            .unwrap();
    }

    let original_ids = page_ids(&store, chapter_id);
    assert_eq!(page_numbers(&store, chapter_id), vec![1, 2, 3, 4]);

    assert!(store.move_page(chapter_id, 0, 2));
    assert_eq!(
        page_ids(&store, chapter_id),
        vec![original_ids[1], original_ids[2], original_ids[0], original_ids[3]]
    );
    // Numbers always read 1..N in list order.
    assert_eq!(page_numbers(&store, chapter_id), vec![1, 2, 3, 4]);

    assert!(store.move_page(chapter_id, 2, 0));
    assert_eq!(page_ids(&store, chapter_id), original_ids);
    assert_eq!(page_numbers(&store, chapter_id), vec![1, 2, 3, 4]);
}

#[test]
fn move_page_out_of_range_is_a_noop() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    for i in 1..=2 {
        store
            .add_page(chapter_id, format!("pages/{i:03}.png"), 800.0, 1200.0)
            .unwrap();
    }
    let before = page_ids(&store, chapter_id);

    assert!(!store.move_page(chapter_id, 0, 5));
    assert!(!store.move_page(chapter_id, 7, 0));
    assert_eq!(page_ids(&store, chapter_id), before);
}

#[test]
fn mutations_produce_fresh_page_snapshots_and_share_siblings() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    let page_a = store.add_page(chapter_id, "pages/001.png", 800.0, 1200.0).unwrap();
    let page_b = store.add_page(chapter_id, "pages/002.png", 800.0, 1200.0).unwrap();
    let element_id = store.add_text_block(page_a, "abc", 10.0, 10.0, 100.0, 40.0).unwrap();

    let snap_a: Arc<_> = store.page(page_a).unwrap().clone();
    let snap_b: Arc<_> = store.page(page_b).unwrap().clone();

    store.update_element(
        page_a,
        element_id,
        ElementPatch::target_text("hello"),
    );

    // The mutated page is a new snapshot; its sibling is untouched and
    // still shared by reference.
    assert!(!Arc::ptr_eq(&snap_a, store.page(page_a).unwrap()));
    assert!(Arc::ptr_eq(&snap_b, store.page(page_b).unwrap()));

    // The old snapshot still shows the pre-mutation state.
    assert_eq!(
        snap_a.element(element_id).unwrap().as_text().unwrap().target_text,
        ""
    );
}

#[test]
fn selection_requires_an_element_on_the_open_page() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    let page_a = store.add_page(chapter_id, "pages/001.png", 800.0, 1200.0).unwrap();
    let page_b = store.add_page(chapter_id, "pages/002.png", 800.0, 1200.0).unwrap();
    let on_a = store.add_text_block(page_a, "a", 0.0, 0.0, 10.0, 10.0).unwrap();
    let on_b = store.add_text_block(page_b, "b", 0.0, 0.0, 10.0, 10.0).unwrap();

    store.open_page(Some(page_a));
    assert!(store.select_element(Some(on_a), SelectionOrigin::FromSurface));
    assert_eq!(store.selected_element_id(), Some(on_a));

    // Elements on other pages are rejected.
    assert!(!store.select_element(Some(on_b), SelectionOrigin::FromSurface));
    assert_eq!(store.selected_element_id(), Some(on_a));

    // Switching pages clears the selection.
    store.open_page(Some(page_b));
    assert_eq!(store.selected_element_id(), None);

    // Deleting the selected element clears the selection.
    store.select_element(Some(on_b), SelectionOrigin::FromModel);
    store.delete_element(page_b, on_b);
    assert_eq!(store.selected_element_id(), None);
}

#[test]
fn selection_events_carry_their_origin() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    let page_id = store.add_page(chapter_id, "pages/001.png", 800.0, 1200.0).unwrap();
    let element_id = store.add_text_block(page_id, "a", 0.0, 0.0, 10.0, 10.0).unwrap();
    store.open_page(Some(page_id));

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.events().subscribe(EventFilter::All, move |event| {
        if let AppEvent::Selection(SelectionEvent::Changed { element_id, origin }) = event {
            sink.lock().unwrap().push((element_id, origin));
        }
    });

    store.select_element(Some(element_id), SelectionOrigin::FromSurface);
    // Re-selecting the same element publishes nothing.
    store.select_element(Some(element_id), SelectionOrigin::FromSurface);
    store.clear_selection();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (Some(element_id), SelectionOrigin::FromSurface));
    assert_eq!(seen[1], (None, SelectionOrigin::FromModel));
}

#[test]
fn locked_elements_reject_geometry_but_accept_text() {
    let mut store = DocumentStore::new();
    let project_id = store.create_project("Moon Arc", "ja", "en");
    let chapter_id = store.create_chapter(project_id, "Chapter 1").unwrap();
    let page_id = store.add_page(chapter_id, "pages/001.png", 800.0, 1200.0).unwrap();
    let element_id = store.add_text_block(page_id, "abc", 10.0, 20.0, 100.0, 40.0).unwrap();

    store.update_element(
        page_id,
        element_id,
        ElementPatch {
            is_locked: Some(true),
            ..ElementPatch::default()
        },
    );

    // Geometry writes are dropped...
    store.update_element(
        page_id,
        element_id,
        ElementPatch::transform(500.0, 500.0, 10.0, 10.0, 45.0),
    );
    let el = store.page(page_id).unwrap().element(element_id).unwrap().clone();
    assert_eq!((el.x, el.y, el.rotation), (10.0, 20.0, 0.0));

    // ...but text content still lands.
    store.update_element(page_id, element_id, ElementPatch::target_text("fixed typo"));
    let el = store.page(page_id).unwrap().element(element_id).unwrap().clone();
    assert_eq!(el.as_text().unwrap().target_text, "fixed typo");

    // Unlocking within the same patch re-enables geometry.
    store.update_element(
        page_id,
        element_id,
        ElementPatch {
            is_locked: Some(false),
            x: Some(42.0),
            ..ElementPatch::default()
        },
    );
    let el = store.page(page_id).unwrap().element(element_id).unwrap().clone();
    assert!(!el.is_locked);
    assert_eq!(el.x, 42.0);
}
