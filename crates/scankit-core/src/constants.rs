//! Shared constants used across ScanKit crates.

/// Minimum viewport zoom factor (10%).
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum viewport zoom factor (500%).
pub const MAX_ZOOM: f64 = 5.0;

/// Padding in container pixels reserved on each edge by fit-to-view.
pub const FIT_PADDING: f64 = 10.0;

/// Fallback logical page width when the source image cannot be decoded.
pub const DEFAULT_PAGE_WIDTH: f64 = 800.0;

/// Fallback logical page height when the source image cannot be decoded.
pub const DEFAULT_PAGE_HEIGHT: f64 = 1200.0;

/// Offset in page-logical units applied when duplicating an element.
pub const DUPLICATE_OFFSET: f64 = 16.0;

/// Multiplicative zoom step for wheel/keyboard zoom in.
pub const ZOOM_STEP: f64 = 1.2;
