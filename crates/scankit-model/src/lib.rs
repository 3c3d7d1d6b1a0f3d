//! # ScanKit Model
//!
//! The document model for ScanKit: a pure state container over
//! projects → chapters → pages → canvas elements.
//!
//! ## Design
//!
//! - **Immutable snapshots.** Chapters and pages live behind `Arc`; a
//!   mutation rebuilds only the path from the changed entity to its
//!   project. Consumers hold the previous `Arc<Page>` and compare with
//!   `Arc::ptr_eq` to detect change — the scene synchronizer's trigger.
//! - **Single writer.** All mutations are synchronous methods on
//!   [`DocumentStore`]; the store publishes a `DocumentEvent` on its
//!   [`EventBus`](scankit_core::EventBus) after each applied mutation.
//! - **No errors for bad ids.** Unknown targets are quiet no-ops
//!   (`false`/`None` returns, debug logs); the editor session never
//!   crashes on a stale id.

pub mod element;
pub mod entities;
pub mod store;

pub use element::{
    CanvasElement, ElementKind, ElementPatch, Point, ShapeElement, ShapeKind, TextAlign, TextBlock,
};
pub use entities::{Chapter, ChapterPatch, Page, PagePatch, Project, ProjectPatch};
pub use store::{DocumentStore, EditorTool};

// Selection transitions carry their origin; re-exported so editor hosts
// don't need a direct scankit-core dependency for the common case.
pub use scankit_core::event_bus::SelectionOrigin;
