//! Viewport state and coordinate transformation for the editor canvas.
//!
//! The rendering surface is always drawn at page-logical size; zoom and
//! pan are realized purely as an external scale+translate on the surface
//! container, so zoom changes never re-lay-out the scene graph. This
//! module owns that transform: a zoom scalar clamped to
//! [`MIN_ZOOM`, `MAX_ZOOM`] and a pan offset in container pixels.

use std::fmt;

use scankit_core::constants::{FIT_PADDING, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use scankit_model::Point;

/// Pan offset in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan: PanOffset,
}

impl Viewport {
    /// Creates a viewport at 100% zoom with no pan.
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: PanOffset::default(),
        }
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the global bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Gets the pan offset.
    pub fn pan_offset(&self) -> PanOffset {
        self.pan
    }

    /// Sets the pan offset.
    pub fn set_pan_offset(&mut self, x: f64, y: f64) {
        self.pan = PanOffset::new(x, y);
    }

    /// Pans by a delta amount.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Scales and centers the full page inside the container.
    ///
    /// `zoom = min((cw − 2·pad)/iw, (ch − 2·pad)/ih)` with a fixed pad of
    /// [`FIT_PADDING`] pixels, then the scaled page is centered. Only the
    /// global zoom bounds apply beyond that.
    pub fn fit_to_view(
        &mut self,
        container_width: f64,
        container_height: f64,
        image_width: f64,
        image_height: f64,
    ) {
        if image_width <= 0.0 || image_height <= 0.0 {
            return;
        }
        let available_width = container_width - FIT_PADDING * 2.0;
        let available_height = container_height - FIT_PADDING * 2.0;

        let scale_x = available_width / image_width;
        let scale_y = available_height / image_height;
        let fit_zoom = scale_x.min(scale_y).clamp(MIN_ZOOM, MAX_ZOOM);

        self.zoom = fit_zoom;
        self.center(container_width, container_height, image_width, image_height);
    }

    /// Resets to 100% zoom, recentered inside the container.
    pub fn reset(
        &mut self,
        container_width: f64,
        container_height: f64,
        image_width: f64,
        image_height: f64,
    ) {
        self.zoom = 1.0;
        self.center(container_width, container_height, image_width, image_height);
    }

    /// Zooms by a multiplicative factor, keeping the page point under
    /// `(pointer_x, pointer_y)` visually fixed.
    pub fn zoom_at_point(&mut self, pointer_x: f64, pointer_y: f64, delta_factor: f64) {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * delta_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == old_zoom {
            return;
        }
        let ratio = new_zoom / old_zoom;
        self.pan = PanOffset::new(
            pointer_x - (pointer_x - self.pan.x) * ratio,
            pointer_y - (pointer_y - self.pan.y) * ratio,
        );
        self.zoom = new_zoom;
    }

    /// Converts container pixel coordinates to page-logical coordinates.
    pub fn container_to_page(&self, x: f64, y: f64) -> Point {
        Point::new((x - self.pan.x) / self.zoom, (y - self.pan.y) / self.zoom)
    }

    /// Converts page-logical coordinates to container pixel coordinates.
    pub fn page_to_container(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.pan.x, y * self.zoom + self.pan.y)
    }

    fn center(
        &mut self,
        container_width: f64,
        container_height: f64,
        image_width: f64,
        image_height: f64,
    ) {
        self.pan = PanOffset::new(
            (container_width - image_width * self.zoom) / 2.0,
            (container_height - image_height * self.zoom) / 2.0,
        );
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan.x, self.pan.y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
