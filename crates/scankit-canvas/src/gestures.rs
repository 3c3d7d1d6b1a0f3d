//! Pointer, wheel, and touch translation into viewport updates.
//!
//! The controller owns the transient gesture state (an active pan drag or
//! pinch) and applies the resulting transform to a [`Viewport`]. A single
//! touch behaves exactly like a mouse pointer; two touches drive a pinch
//! whose zoom (centroid-anchored, multiplicative) and pan (centroid
//! movement, additive) apply simultaneously and independently.

use crate::viewport::{PanOffset, Viewport};

/// A raw input event in container pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Wheel zoom; `delta_factor` is the multiplicative zoom change
    /// (e.g. 1.1 per notch up, 1/1.1 per notch down).
    Wheel { x: f64, y: f64, delta_factor: f64 },
    TouchStart { points: Vec<(f64, f64)> },
    TouchMove { points: Vec<(f64, f64)> },
    TouchEnd,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    start_x: f64,
    start_y: f64,
    origin: PanOffset,
}

#[derive(Debug, Clone, Copy)]
struct PinchState {
    distance: f64,
    centroid: (f64, f64),
}

/// Translates raw input events into viewport mutations.
#[derive(Debug, Default)]
pub struct GestureController {
    pan_mode: bool,
    drag: Option<DragState>,
    pinch: Option<PinchState>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether pointer drags pan the viewport.
    pub fn pan_mode(&self) -> bool {
        self.pan_mode
    }

    /// Enables or disables pan-mode dragging; disabling cancels an
    /// in-progress drag.
    pub fn set_pan_mode(&mut self, enabled: bool) {
        self.pan_mode = enabled;
        if !enabled {
            self.drag = None;
        }
    }

    /// True while a pan drag is active.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feeds one input event through the controller, mutating the
    /// viewport as required. Returns true when the viewport changed.
    pub fn handle(&mut self, viewport: &mut Viewport, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.begin_drag(viewport, x, y);
                false
            }
            InputEvent::PointerMove { x, y } => self.move_drag(viewport, x, y),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.drag = None;
                false
            }
            InputEvent::Wheel { x, y, delta_factor } => {
                let before = viewport.zoom();
                viewport.zoom_at_point(x, y, delta_factor);
                viewport.zoom() != before
            }
            InputEvent::TouchStart { points } => {
                match points.as_slice() {
                    [(x, y)] => self.begin_drag(viewport, *x, *y),
                    [a, b, ..] => {
                        self.drag = None;
                        self.pinch = Some(PinchState {
                            distance: distance(*a, *b),
                            centroid: centroid(*a, *b),
                        });
                    }
                    [] => {}
                }
                false
            }
            InputEvent::TouchMove { points } => match points.as_slice() {
                [(x, y)] => self.move_drag(viewport, *x, *y),
                [a, b, ..] => self.move_pinch(viewport, *a, *b),
                [] => false,
            },
            InputEvent::TouchEnd => {
                self.drag = None;
                self.pinch = None;
                false
            }
        }
    }

    fn begin_drag(&mut self, viewport: &Viewport, x: f64, y: f64) {
        if self.pan_mode {
            self.drag = Some(DragState {
                start_x: x,
                start_y: y,
                origin: viewport.pan_offset(),
            });
        }
    }

    fn move_drag(&mut self, viewport: &mut Viewport, x: f64, y: f64) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        viewport.set_pan_offset(
            drag.origin.x + (x - drag.start_x),
            drag.origin.y + (y - drag.start_y),
        );
        true
    }

    fn move_pinch(&mut self, viewport: &mut Viewport, a: (f64, f64), b: (f64, f64)) -> bool {
        let Some(prev) = self.pinch else {
            // Second finger landed without a TouchStart; start tracking.
            self.pinch = Some(PinchState {
                distance: distance(a, b),
                centroid: centroid(a, b),
            });
            return false;
        };

        let dist = distance(a, b);
        let cent = centroid(a, b);

        if prev.distance > 0.0 && dist > 0.0 {
            viewport.zoom_at_point(cent.0, cent.1, dist / prev.distance);
        }
        viewport.pan_by(cent.0 - prev.centroid.0, cent.1 - prev.centroid.1);

        self.pinch = Some(PinchState {
            distance: dist,
            centroid: cent,
        });
        true
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

fn centroid(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
