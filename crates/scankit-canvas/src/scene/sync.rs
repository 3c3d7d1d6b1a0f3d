//! Scene synchronization: keeps the surface object graph consistent with
//! the document model's open page, and feeds surface gestures back into
//! the model.
//!
//! Two suppression states are never violated:
//!
//! - while a text node is being edited live, no reconciliation pass runs
//!   at all (touching the live object moves the user's cursor);
//! - while a node is the current selection, its properties are never
//!   overwritten from the model (the surface is the source of truth for
//!   an in-progress gesture; reapplying stale values snaps visibly).
//!
//! After an edit exits, the edited node stays guarded for one more
//! reconcile pass so the final text write is observed before the
//! synchronizer resumes overwriting that node. The guard is counted in
//! passes, not wall-clock time.

use std::sync::Arc;

use uuid::Uuid;

use scankit_core::event_bus::SelectionOrigin;
use scankit_model::{DocumentStore, ElementPatch, Page};

use super::{ObjectGraph, SceneNode};

/// Reconcile passes an edit-exited node stays guarded for.
const EDIT_EXIT_GRACE_PASSES: u8 = 1;

/// Keeps a live [`ObjectGraph`] consistent with the open page.
#[derive(Debug, Default)]
pub struct SceneSynchronizer {
    graph: ObjectGraph,
    last_page: Option<Arc<Page>>,
    /// Element under live text edit, if any.
    editing: Option<Uuid>,
    /// Element whose edit just exited, still guarded.
    grace_node: Option<Uuid>,
    grace_passes: u8,
    needs_repaint: bool,
}

impl SceneSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    /// Mutable access for the host surface to apply in-progress gesture
    /// state (position, scale, rotation) to nodes.
    pub fn graph_mut(&mut self) -> &mut ObjectGraph {
        &mut self.graph
    }

    /// The element currently under live text edit.
    pub fn editing_element(&self) -> Option<Uuid> {
        self.editing
    }

    /// Returns and clears the repaint flag.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    /// Whether the open page changed since the last completed pass.
    /// Snapshot identity (`Arc::ptr_eq`) is the change signal; element
    /// mutations always produce a fresh page snapshot.
    pub fn needs_reconcile(&self, store: &DocumentStore) -> bool {
        match (&self.last_page, store.current_page()) {
            (Some(prev), Some(current)) => !Arc::ptr_eq(prev, current),
            (None, None) => false,
            _ => true,
        }
    }

    /// Aligns the object graph to the model's open page.
    ///
    /// Runs to completion synchronously; the host repaints afterwards.
    /// No-op while a text edit is live.
    pub fn reconcile(&mut self, store: &DocumentStore) {
        if self.editing.is_some() {
            tracing::trace!("reconcile skipped: text edit in progress");
            return;
        }

        let Some(page) = store.current_page() else {
            if !self.graph.is_empty() {
                self.graph.clear();
                self.needs_repaint = true;
            }
            self.last_page = None;
            return;
        };
        let page = page.clone();

        // 1. Drop nodes whose element no longer exists.
        for id in self.graph.ids() {
            if page.element(id).is_none() {
                self.graph.remove(id);
            }
        }

        // 2/3. Walk elements in paint order: create missing nodes,
        // overwrite the rest unless suppressed.
        let mut order = Vec::with_capacity(page.elements.len());
        for element in page.elements_in_paint_order() {
            order.push(element.id);
            match self.graph.node_mut(element.id) {
                None => {
                    self.graph.insert(SceneNode::from_element(element));
                }
                Some(node) => {
                    if node.editing || node.selected || self.grace_node == Some(element.id) {
                        continue;
                    }
                    node.apply_element(element);
                }
            }
        }
        self.graph.set_paint_order(order);

        // 4. Repaint and remember the snapshot we are aligned to.
        self.needs_repaint = true;
        self.last_page = Some(page);

        if self.grace_passes > 0 {
            self.grace_passes -= 1;
            if self.grace_passes == 0 {
                self.grace_node = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Surface → model feedback
    // ------------------------------------------------------------------

    /// Completes a move/resize/rotate gesture: folds the surface's render
    /// scale into width/height, resets it to 1x, and writes the final
    /// geometry and opacity back to the model.
    pub fn finish_transform(&mut self, store: &mut DocumentStore, id: Uuid) -> bool {
        let Some(page) = store.current_page() else {
            return false;
        };
        let page_id = page.id;

        let Some(node) = self.graph.node_mut(id) else {
            tracing::debug!(%id, "finish_transform: no such node");
            return false;
        };
        node.width = node.effective_width();
        node.height = node.effective_height();
        node.scale_x = 1.0;
        node.scale_y = 1.0;

        let mut patch = ElementPatch::transform(node.x, node.y, node.width, node.height, node.rotation);
        patch.opacity = Some(node.opacity);
        store.update_element(page_id, id, patch)
    }

    /// Reports a selection change originating on the surface. Node flags
    /// are updated here; the store write is tagged `FromSurface` so the
    /// echoed event is distinguishable from model-originated changes.
    pub fn select_from_surface(&mut self, store: &mut DocumentStore, id: Option<Uuid>) -> bool {
        self.apply_selection_flags(id);
        store.select_element(id, SelectionOrigin::FromSurface)
    }

    /// Applies a selection transition observed on the store's event bus.
    /// Surface-originated transitions are echoes of [`Self::select_from_surface`]
    /// and are ignored; reapplying them would fight the in-progress
    /// gesture that caused them.
    pub fn handle_selection_changed(&mut self, id: Option<Uuid>, origin: SelectionOrigin) {
        if origin == SelectionOrigin::FromSurface {
            return;
        }
        self.apply_selection_flags(id);
        self.needs_repaint = true;
    }

    /// Begins a live text edit on a node. While the edit is active no
    /// reconcile pass touches the graph.
    pub fn begin_text_edit(&mut self, id: Uuid) -> bool {
        let Some(node) = self.graph.node_mut(id) else {
            tracing::debug!(%id, "begin_text_edit: no such node");
            return false;
        };
        if !matches!(node.kind, super::NodeKind::Text { .. }) {
            return false;
        }
        node.editing = true;
        self.editing = Some(id);
        true
    }

    /// Pushes the user's in-progress text into the node and the model, so
    /// external consumers (a side-panel grid, for one) update live.
    pub fn push_live_text(&mut self, store: &mut DocumentStore, text: &str) -> bool {
        let Some(id) = self.editing else {
            return false;
        };
        if let Some(node) = self.graph.node_mut(id) {
            if let super::NodeKind::Text { content, .. } = &mut node.kind {
                *content = text.to_string();
            }
        }
        let Some(page) = store.current_page() else {
            return false;
        };
        let page_id = page.id;
        store.update_element(page_id, id, ElementPatch::target_text(text))
    }

    /// Ends the live edit with a final authoritative write, then guards
    /// the node for one more reconcile pass.
    pub fn end_text_edit(&mut self, store: &mut DocumentStore, final_text: &str) -> bool {
        let Some(id) = self.editing else {
            return false;
        };
        if let Some(node) = self.graph.node_mut(id) {
            if let super::NodeKind::Text { content, .. } = &mut node.kind {
                *content = final_text.to_string();
            }
            node.editing = false;
        }
        self.editing = None;
        self.grace_node = Some(id);
        self.grace_passes = EDIT_EXIT_GRACE_PASSES;

        let Some(page) = store.current_page() else {
            return false;
        };
        let page_id = page.id;
        store.update_element(page_id, id, ElementPatch::target_text(final_text))
    }

    /// Topmost visible node at the given page-logical point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Uuid> {
        self.graph.hit_test(x, y)
    }

    fn apply_selection_flags(&mut self, id: Option<Uuid>) {
        for node_id in self.graph.ids() {
            if let Some(node) = self.graph.node_mut(node_id) {
                node.selected = Some(node_id) == id;
            }
        }
    }
}
