//! Canvas element types: the tagged union of everything that can sit on a
//! page, plus the patch type used for partial updates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point in page-logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal text alignment within a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    fn default() -> Self {
        Self::Center
    }
}

/// Geometric shape variants for overlay shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Triangle,
    Line,
    Polygon,
}

impl ShapeKind {
    /// Default display label for a freshly created shape.
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Rect => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Line => "Line",
            ShapeKind::Polygon => "Polygon",
        }
    }
}

/// Text content and typography of a text element.
///
/// `source_text` is the immutable OCR (or manually entered) original;
/// `target_text` is the translated text the letterer edits. The editor
/// always displays `target_text` verbatim once set; only rendering
/// contexts fall back to the source when the target is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub source_text: String,
    pub target_text: String,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_align: TextAlign,
    /// Fill color as `#rrggbb`.
    pub fill: String,
    /// Optional outline color as `#rrggbb`.
    pub stroke: Option<String>,
    pub stroke_width: f64,
    /// OCR confidence in [0, 1]; 0 for manually created blocks.
    pub confidence: f64,
}

impl TextBlock {
    /// The string a renderer should draw: the target text, falling back
    /// to the source text while no translation has been entered.
    pub fn rendered_text(&self) -> &str {
        if self.target_text.is_empty() {
            &self.source_text
        } else {
            &self.target_text
        }
    }
}

impl Default for TextBlock {
    fn default() -> Self {
        Self {
            source_text: String::new(),
            target_text: String::new(),
            font_size: 16.0,
            font_family: "Arial".to_string(),
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            text_align: TextAlign::Center,
            fill: "#000000".to_string(),
            stroke: None,
            stroke_width: 0.0,
            confidence: 0.0,
        }
    }
}

/// Style of a non-text overlay shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub shape: ShapeKind,
    /// Fill color as `#rrggbb`.
    pub fill: String,
    /// Optional outline color as `#rrggbb`.
    pub stroke: Option<String>,
    pub stroke_width: f64,
    /// Corner radius; meaningful for rectangles only.
    pub corner_radius: Option<f64>,
    /// Vertex list; meaningful for lines and polygons only.
    pub points: Option<Vec<Point>>,
}

impl ShapeElement {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            fill: "#ffffff".to_string(),
            stroke: Some("#000000".to_string()),
            stroke_width: 1.0,
            corner_radius: None,
            points: None,
        }
    }
}

/// Content variant of a canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextBlock),
    Shape(ShapeElement),
}

/// One object on a page's canvas.
///
/// Geometry is in page-logical units with `(x, y)` the top-left corner;
/// `rotation` is clockwise degrees around the element center. `z_index`
/// alone determines paint order (ascending, stable insertion order for
/// ties); the position in `Page::elements` is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub opacity: f64,
    /// Blocks move/resize/rotate; text content stays editable.
    pub is_locked: bool,
    pub is_visible: bool,
    pub z_index: i64,
    pub name: String,
    pub kind: ElementKind,
}

impl CanvasElement {
    /// Creates a text element with default typography.
    pub fn text(source_text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        let source_text = source_text.into();
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            is_locked: false,
            is_visible: true,
            z_index: 0,
            name: "Text".to_string(),
            kind: ElementKind::Text(TextBlock {
                source_text,
                ..TextBlock::default()
            }),
        }
    }

    /// Creates a shape element with default styling.
    pub fn shape(shape: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            is_locked: false,
            is_visible: true,
            z_index: 0,
            name: shape.display_name().to_string(),
            kind: ElementKind::Shape(ShapeElement::new(shape)),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            ElementKind::Shape(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match &mut self.kind {
            ElementKind::Text(t) => Some(t),
            ElementKind::Shape(_) => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match &self.kind {
            ElementKind::Text(_) => None,
            ElementKind::Shape(s) => Some(s),
        }
    }

    /// Element center in page-logical units (rotation pivot).
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Partial update for a canvas element.
///
/// `None` fields are left untouched. Text fields apply to text elements
/// only, shape fields to shapes only; fill/stroke apply to both. The id
/// and z-index are never patched directly (z-order has its own
/// operations).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub is_locked: Option<bool>,
    pub is_visible: Option<bool>,
    pub name: Option<String>,
    pub target_text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_align: Option<TextAlign>,
    pub fill: Option<String>,
    /// `Some(None)` clears the stroke, `Some(Some(c))` sets it.
    pub stroke: Option<Option<String>>,
    pub stroke_width: Option<f64>,
    pub corner_radius: Option<f64>,
    pub points: Option<Vec<Point>>,
}

impl ElementPatch {
    /// Convenience patch carrying the final state of a completed
    /// move/resize/rotate gesture.
    pub fn transform(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// Convenience patch for a live or final text-content write.
    pub fn target_text(text: impl Into<String>) -> Self {
        Self {
            target_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// True when the patch touches position, size, or rotation.
    pub fn has_geometry(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.rotation.is_some()
    }

    /// Applies this patch to an element. Geometry fields are skipped when
    /// `allow_geometry` is false (locked elements).
    pub(crate) fn apply_to(&self, el: &mut CanvasElement, allow_geometry: bool) {
        if allow_geometry {
            if let Some(x) = self.x {
                el.x = x;
            }
            if let Some(y) = self.y {
                el.y = y;
            }
            if let Some(width) = self.width {
                el.width = width;
            }
            if let Some(height) = self.height {
                el.height = height;
            }
            if let Some(rotation) = self.rotation {
                el.rotation = rotation;
            }
        }
        if let Some(opacity) = self.opacity {
            el.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(locked) = self.is_locked {
            el.is_locked = locked;
        }
        if let Some(visible) = self.is_visible {
            el.is_visible = visible;
        }
        if let Some(name) = &self.name {
            el.name = name.clone();
        }

        match &mut el.kind {
            ElementKind::Text(text) => {
                if let Some(t) = &self.target_text {
                    text.target_text = t.clone();
                }
                if let Some(size) = self.font_size {
                    text.font_size = size;
                }
                if let Some(family) = &self.font_family {
                    text.font_family = family.clone();
                }
                if let Some(weight) = &self.font_weight {
                    text.font_weight = weight.clone();
                }
                if let Some(style) = &self.font_style {
                    text.font_style = style.clone();
                }
                if let Some(align) = self.text_align {
                    text.text_align = align;
                }
                if let Some(fill) = &self.fill {
                    text.fill = fill.clone();
                }
                if let Some(stroke) = &self.stroke {
                    text.stroke = stroke.clone();
                }
                if let Some(width) = self.stroke_width {
                    text.stroke_width = width;
                }
            }
            ElementKind::Shape(shape) => {
                if let Some(fill) = &self.fill {
                    shape.fill = fill.clone();
                }
                if let Some(stroke) = &self.stroke {
                    shape.stroke = stroke.clone();
                }
                if let Some(width) = self.stroke_width {
                    shape.stroke_width = width;
                }
                if let Some(radius) = self.corner_radius {
                    shape.corner_radius = Some(radius);
                }
                if let Some(points) = &self.points {
                    shape.points = Some(points.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_text_falls_back_to_source() {
        let mut block = TextBlock {
            source_text: "こんにちは".to_string(),
            ..TextBlock::default()
        };
        assert_eq!(block.rendered_text(), "こんにちは");

        block.target_text = "Hello".to_string();
        assert_eq!(block.rendered_text(), "Hello");
    }

    #[test]
    fn patch_skips_geometry_when_locked() {
        let mut el = CanvasElement::text("abc", 10.0, 10.0, 100.0, 40.0);
        el.is_locked = true;

        let patch = ElementPatch {
            x: Some(99.0),
            target_text: Some("translated".to_string()),
            ..ElementPatch::default()
        };
        let allow = !el.is_locked || patch.is_locked == Some(false);
        patch.apply_to(&mut el, allow);

        assert_eq!(el.x, 10.0);
        assert_eq!(el.as_text().unwrap().target_text, "translated");
    }

    #[test]
    fn patch_clears_stroke() {
        let mut el = CanvasElement::shape(ShapeKind::Rect, 0.0, 0.0, 10.0, 10.0);
        assert!(el.as_shape().unwrap().stroke.is_some());

        let patch = ElementPatch {
            stroke: Some(None),
            ..ElementPatch::default()
        };
        patch.apply_to(&mut el, true);
        assert!(el.as_shape().unwrap().stroke.is_none());
    }
}
