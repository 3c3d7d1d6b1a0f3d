//! Canvas element operations: creation, patches, duplication, z-order,
//! and the selection integration point between pointer interaction and
//! document mutation.
//!
//! Z-order rules: paint order is ascending `z_index` with insertion-order
//! ties. Structural changes (add/remove/duplicate/explicit reorder)
//! renormalize indices to a dense 0..N-1 run; `bring_to_front` and
//! `send_to_back` intentionally push past the current extremes without
//! renormalizing.

use uuid::Uuid;

use scankit_core::constants::DUPLICATE_OFFSET;
use scankit_core::event_bus::{DocumentEvent, SelectionOrigin};

use super::DocumentStore;
use crate::element::{CanvasElement, ElementPatch, ShapeKind};

impl DocumentStore {
    /// Appends an element to a page. The element receives a fresh id and
    /// paints on top of everything already there. Returns the new id.
    pub fn add_element(&mut self, page_id: Uuid, mut element: CanvasElement) -> Option<Uuid> {
        element.id = Uuid::new_v4();
        let id = element.id;
        let applied = self.with_page(page_id, |page| {
            element.z_index = page.max_z().max(0) + 1;
            page.elements.push(element);
            page.renormalize_z();
        });
        if !applied {
            tracing::debug!(%page_id, "add_element: unknown page");
            return None;
        }
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        Some(id)
    }

    /// Convenience: appends a text block with default typography.
    pub fn add_text_block(
        &mut self,
        page_id: Uuid,
        source_text: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Option<Uuid> {
        self.add_element(page_id, CanvasElement::text(source_text, x, y, width, height))
    }

    /// Convenience: appends a shape with default styling.
    pub fn add_shape(
        &mut self,
        page_id: Uuid,
        shape: ShapeKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Option<Uuid> {
        self.add_element(page_id, CanvasElement::shape(shape, x, y, width, height))
    }

    /// Applies a partial update to an element. Locked elements silently
    /// drop the geometry fields of the patch (position, size, rotation)
    /// unless the same patch unlocks them; everything else still applies.
    pub fn update_element(&mut self, page_id: Uuid, element_id: Uuid, patch: ElementPatch) -> bool {
        if !self.element_exists(page_id, element_id) {
            tracing::debug!(%page_id, %element_id, "update_element: unknown target");
            return false;
        }
        self.with_page(page_id, |page| {
            if let Some(el) = page.element_mut(element_id) {
                let allow_geometry = !el.is_locked || patch.is_locked == Some(false);
                if el.is_locked && patch.has_geometry() && !allow_geometry {
                    tracing::debug!(%element_id, "geometry update dropped for locked element");
                }
                patch.apply_to(el, allow_geometry);
            }
        });
        self.publish_doc(DocumentEvent::ElementUpdated {
            page_id,
            element_id,
        });
        true
    }

    /// Removes an element, clearing the selection if it was selected.
    pub fn delete_element(&mut self, page_id: Uuid, element_id: Uuid) -> bool {
        if !self.element_exists(page_id, element_id) {
            tracing::debug!(%page_id, %element_id, "delete_element: unknown target");
            return false;
        }
        self.with_page(page_id, |page| {
            page.elements.retain(|e| e.id != element_id);
            page.renormalize_z();
        });
        if self.selected_element_id() == Some(element_id) {
            self.set_selection(None, SelectionOrigin::FromModel);
        }
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        true
    }

    /// Clones an element onto the same page with a small offset. The copy
    /// gets a fresh id and paints on top. Returns the copy's id.
    pub fn duplicate_element(&mut self, page_id: Uuid, element_id: Uuid) -> Option<Uuid> {
        let source = self.page(page_id)?.element(element_id)?.clone();
        let mut copy = source;
        copy.id = Uuid::new_v4();
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        copy.name = format!("{} copy", copy.name);
        let id = copy.id;
        self.with_page(page_id, |page| {
            copy.z_index = page.max_z().max(0) + 1;
            page.elements.push(copy);
            page.renormalize_z();
        });
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        Some(id)
    }

    /// Assigns an explicit z-index, then renormalizes to a dense run.
    pub fn reorder_element(&mut self, page_id: Uuid, element_id: Uuid, new_z: i64) -> bool {
        if !self.element_exists(page_id, element_id) {
            tracing::debug!(%page_id, %element_id, "reorder_element: unknown target");
            return false;
        }
        self.with_page(page_id, |page| {
            if let Some(el) = page.element_mut(element_id) {
                el.z_index = new_z;
            }
            page.renormalize_z();
        });
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        true
    }

    /// Moves an element above everything else on its page.
    pub fn bring_to_front(&mut self, page_id: Uuid, element_id: Uuid) -> bool {
        if !self.element_exists(page_id, element_id) {
            tracing::debug!(%page_id, %element_id, "bring_to_front: unknown target");
            return false;
        }
        self.with_page(page_id, |page| {
            let max = page.max_z();
            if let Some(el) = page.element_mut(element_id) {
                el.z_index = max + 1;
            }
        });
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        true
    }

    /// Moves an element below everything else on its page.
    pub fn send_to_back(&mut self, page_id: Uuid, element_id: Uuid) -> bool {
        if !self.element_exists(page_id, element_id) {
            tracing::debug!(%page_id, %element_id, "send_to_back: unknown target");
            return false;
        }
        self.with_page(page_id, |page| {
            let min = page.min_z();
            if let Some(el) = page.element_mut(element_id) {
                el.z_index = min - 1;
            }
        });
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        true
    }

    /// Swaps z with the next element above in paint order. No-op at the
    /// top.
    pub fn move_element_up(&mut self, page_id: Uuid, element_id: Uuid) -> bool {
        self.swap_with_neighbor(page_id, element_id, true)
    }

    /// Swaps z with the next element below in paint order. No-op at the
    /// bottom.
    pub fn move_element_down(&mut self, page_id: Uuid, element_id: Uuid) -> bool {
        self.swap_with_neighbor(page_id, element_id, false)
    }

    fn swap_with_neighbor(&mut self, page_id: Uuid, element_id: Uuid, up: bool) -> bool {
        // Resolve the swap against the current snapshot first; boundary
        // no-ops must not produce a new page snapshot.
        let Some(page) = self.page(page_id) else {
            tracing::debug!(%page_id, "swap_with_neighbor: unknown page");
            return false;
        };
        let order = page.z_sorted_indices();
        let Some(pos) = order.iter().position(|&i| page.elements[i].id == element_id) else {
            tracing::debug!(%page_id, %element_id, "swap_with_neighbor: unknown target");
            return false;
        };
        let neighbor_pos = if up {
            if pos + 1 >= order.len() {
                return false;
            }
            pos + 1
        } else {
            if pos == 0 {
                return false;
            }
            pos - 1
        };
        let (a, b) = (order[pos], order[neighbor_pos]);

        self.with_page(page_id, |page| {
            let z_a = page.elements[a].z_index;
            page.elements[a].z_index = page.elements[b].z_index;
            page.elements[b].z_index = z_a;
        });
        self.publish_doc(DocumentEvent::ElementsChanged { page_id });
        true
    }

    fn element_exists(&self, page_id: Uuid, element_id: Uuid) -> bool {
        self.page(page_id)
            .is_some_and(|p| p.element(element_id).is_some())
    }

    /// Updates the active selection. A `Some` id must name an element on
    /// the currently open page; anything else is a quiet no-op. The
    /// origin travels with the published transition so surface-originated
    /// writes are distinguishable from model-originated ones.
    pub fn select_element(&mut self, element_id: Option<Uuid>, origin: SelectionOrigin) -> bool {
        if let Some(id) = element_id {
            let valid = self.current_page().is_some_and(|p| p.element(id).is_some());
            if !valid {
                tracing::debug!(%id, "select_element: not on the open page");
                return false;
            }
        }
        self.set_selection(element_id, origin);
        true
    }

    /// Clears the active selection.
    pub fn clear_selection(&mut self) {
        self.set_selection(None, SelectionOrigin::FromModel);
    }
}
