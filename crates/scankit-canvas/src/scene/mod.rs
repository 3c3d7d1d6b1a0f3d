//! The rendering-surface object graph: one mutable node per canvas
//! element, kept consistent with the document model by the
//! [`SceneSynchronizer`](crate::SceneSynchronizer).

mod sync;

pub use sync::SceneSynchronizer;

use std::collections::HashMap;

use uuid::Uuid;

use scankit_model::{CanvasElement, ElementKind, Point, ShapeKind, TextAlign};

/// Kind-specific state of a scene node, mirrored from the element.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Text {
        /// The string currently shown on the surface. During a live edit
        /// this is the user's in-progress text, not the model's.
        content: String,
        font_size: f64,
        font_family: String,
        font_weight: String,
        font_style: String,
        text_align: TextAlign,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
    },
    Shape {
        shape: ShapeKind,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
        corner_radius: Option<f64>,
        points: Option<Vec<Point>>,
    },
}

/// A live, mutable render object on the surface.
///
/// Geometry is in page-logical units. `scale_x`/`scale_y` are the
/// surface's internal render scale during a resize gesture; they are
/// folded back into width/height (and reset to 1) when the gesture
/// completes, so the model never stores a residual scale factor.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
    pub editing: bool,
    pub z_index: i64,
    pub kind: NodeKind,
}

impl SceneNode {
    /// Constructs a node mirroring a model element 1:1.
    pub fn from_element(element: &CanvasElement) -> Self {
        let mut node = Self {
            id: element.id,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            selected: false,
            editing: false,
            z_index: 0,
            kind: match &element.kind {
                ElementKind::Text(_) => NodeKind::Text {
                    content: String::new(),
                    font_size: 0.0,
                    font_family: String::new(),
                    font_weight: String::new(),
                    font_style: String::new(),
                    text_align: TextAlign::Center,
                    fill: String::new(),
                    stroke: None,
                    stroke_width: 0.0,
                },
                ElementKind::Shape(s) => NodeKind::Shape {
                    shape: s.shape,
                    fill: String::new(),
                    stroke: None,
                    stroke_width: 0.0,
                    corner_radius: None,
                    points: None,
                },
            },
        };
        node.apply_element(element);
        node
    }

    /// Overwrites every mutable property from the model element. Resets
    /// any residual gesture scale.
    pub fn apply_element(&mut self, element: &CanvasElement) {
        self.x = element.x;
        self.y = element.y;
        self.width = element.width;
        self.height = element.height;
        self.scale_x = 1.0;
        self.scale_y = 1.0;
        self.rotation = element.rotation;
        self.opacity = element.opacity;
        self.visible = element.is_visible;
        self.locked = element.is_locked;
        self.z_index = element.z_index;

        match (&mut self.kind, &element.kind) {
            (
                NodeKind::Text {
                    content,
                    font_size,
                    font_family,
                    font_weight,
                    font_style,
                    text_align,
                    fill,
                    stroke,
                    stroke_width,
                },
                ElementKind::Text(text),
            ) => {
                *content = text.rendered_text().to_string();
                *font_size = text.font_size;
                *font_family = text.font_family.clone();
                *font_weight = text.font_weight.clone();
                *font_style = text.font_style.clone();
                *text_align = text.text_align;
                *fill = text.fill.clone();
                *stroke = text.stroke.clone();
                *stroke_width = text.stroke_width;
            }
            (
                NodeKind::Shape {
                    shape,
                    fill,
                    stroke,
                    stroke_width,
                    corner_radius,
                    points,
                },
                ElementKind::Shape(model),
            ) => {
                *shape = model.shape;
                *fill = model.fill.clone();
                *stroke = model.stroke.clone();
                *stroke_width = model.stroke_width;
                *corner_radius = model.corner_radius;
                *points = model.points.clone();
            }
            // Variant changed under the same id; rebuild wholesale.
            (kind, _) => {
                let rebuilt = SceneNode::from_element(element);
                *kind = rebuilt.kind;
            }
        }
    }

    /// Effective width with any in-progress gesture scale applied.
    pub fn effective_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Effective height with any in-progress gesture scale applied.
    pub fn effective_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// Hit test in page-logical coordinates, honoring rotation.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let w = self.effective_width();
        let h = self.effective_height();
        let cx = self.x + w / 2.0;
        let cy = self.y + h / 2.0;

        // Rotate the probe into the node's local frame.
        let angle = -self.rotation.to_radians();
        let (sin, cos) = angle.sin_cos();
        let dx = x - cx;
        let dy = y - cy;
        let local_x = cx + dx * cos - dy * sin;
        let local_y = cy + dx * sin + dy * cos;

        local_x >= self.x && local_x <= self.x + w && local_y >= self.y && local_y <= self.y + h
    }
}

/// Id-keyed store of scene nodes plus their paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectGraph {
    nodes: HashMap<Uuid, SceneNode>,
    paint_order: Vec<Uuid>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: Uuid) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: Uuid) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.nodes.keys().copied().collect()
    }

    /// Node ids back-to-front.
    pub fn paint_order(&self) -> &[Uuid] {
        &self.paint_order
    }

    /// Nodes back-to-front.
    pub fn nodes_in_paint_order(&self) -> impl Iterator<Item = &SceneNode> {
        self.paint_order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub(crate) fn insert(&mut self, node: SceneNode) {
        self.nodes.insert(node.id, node);
    }

    pub(crate) fn remove(&mut self, id: Uuid) -> Option<SceneNode> {
        self.paint_order.retain(|&n| n != id);
        self.nodes.remove(&id)
    }

    pub(crate) fn set_paint_order(&mut self, order: Vec<Uuid>) {
        self.paint_order = order;
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.paint_order.clear();
    }

    /// Topmost visible node containing the point, in page-logical
    /// coordinates. Locked nodes still hit (they can be selected, just
    /// not transformed).
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Uuid> {
        self.paint_order
            .iter()
            .rev()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| node.visible && node.contains_point(x, y))
            .map(|node| node.id)
    }
}
