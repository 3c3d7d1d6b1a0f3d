//! # ScanKit Canvas
//!
//! The canvas engine: keeps a live rendering-surface object graph
//! consistent with the document model, and owns the viewport transform
//! the surface is displayed through.
//!
//! ## Architecture
//!
//! ```text
//! DocumentStore (scankit-model)
//!   │  fresh Arc<Page> snapshots + events
//!   ▼
//! SceneSynchronizer ──► ObjectGraph (SceneNode per element)
//!   ▲                      │ paint order, hit testing
//!   │ gesture feedback     ▼
//! host surface          renderer / exporter
//!
//! Viewport + GestureController: zoom/pan as an external container
//! transform, untouched by model mutations.
//! ```

pub mod gestures;
pub mod scene;
pub mod viewport;

pub use gestures::{GestureController, InputEvent};
pub use scene::{NodeKind, ObjectGraph, SceneNode, SceneSynchronizer};
pub use viewport::{PanOffset, Viewport};
