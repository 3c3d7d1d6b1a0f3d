//! # ScanKit
//!
//! A Rust-based comic and manga localization studio core:
//! - Document model for projects, chapters, pages, and canvas elements
//! - Scene synchronization between the model and a rendering surface
//! - Viewport transforms and gesture handling
//! - AI-assisted text detection, translation, and inpainting boundaries
//! - Flattened page export and chapter packaging
//!
//! ## Architecture
//!
//! ScanKit is organized as a workspace with multiple crates:
//!
//! 1. **scankit-core** - Errors, event bus, shared constants
//! 2. **scankit-model** - The document tree and its state container
//! 3. **scankit-canvas** - Scene synchronizer, viewport, gestures
//! 4. **scankit-services** - OCR / translation / inpainting / persistence
//! 5. **scankit-settings** - TOML configuration
//! 6. **scankit-export** - Rasterization and archive packaging
//! 7. **scankit** - Headless driver binary integrating all crates

pub use scankit_canvas as canvas;
pub use scankit_core::{
    AppEvent, DocumentEvent, Error, EventBus, EventFilter, ExportQuality, NotificationEvent,
    PipelineEvent, Result, SelectionEvent, SelectionOrigin, ServiceError, SubscriptionId,
};
pub use scankit_export as export;
pub use scankit_model::{
    CanvasElement, Chapter, DocumentStore, ElementKind, ElementPatch, Page, Project, ShapeKind,
    TextAlign, TextBlock,
};
pub use scankit_services as services;
pub use scankit_settings::ScanKitConfig;

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
