//! Document entities: Project → Chapter → Page ownership tree.
//!
//! Chapters and pages are held behind `Arc` so that a mutation rebuilds
//! only the path from the changed entity up to its project, leaving all
//! siblings shared. Callers detect change with `Arc::ptr_eq` between
//! snapshots; the scene synchronizer relies on this for its page-level
//! change detection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::CanvasElement;

/// A single comic page and its overlay elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    /// Reference to the untouched source image.
    pub original_url: String,
    /// Reference to the inpainted image, once one exists.
    pub cleaned_url: Option<String>,
    /// 1-based position within the chapter; reassigned on reorder.
    pub page_number: u32,
    /// Authoritative logical canvas width, fixed at creation.
    pub width: f64,
    /// Authoritative logical canvas height, fixed at creation.
    pub height: f64,
    /// Elements in insertion order; paint order is by `z_index`.
    pub elements: Vec<CanvasElement>,
    pub is_processed: bool,
    pub is_ocred: bool,
}

impl Page {
    pub fn new(original_url: impl Into<String>, page_number: u32, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_url: original_url.into(),
            cleaned_url: None,
            page_number,
            width,
            height,
            elements: Vec::new(),
            is_processed: false,
            is_ocred: false,
        }
    }

    pub fn element(&self, id: Uuid) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn element_mut(&mut self, id: Uuid) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Largest z-index on the page, or 0 when empty.
    pub fn max_z(&self) -> i64 {
        self.elements.iter().map(|e| e.z_index).max().unwrap_or(0)
    }

    /// Smallest z-index on the page, or 0 when empty.
    pub fn min_z(&self) -> i64 {
        self.elements.iter().map(|e| e.z_index).min().unwrap_or(0)
    }

    /// Indices into `elements` in paint order: ascending z-index, ties
    /// broken by insertion order.
    pub fn z_sorted_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| (self.elements[i].z_index, i));
        order
    }

    /// Elements in paint order (back to front).
    pub fn elements_in_paint_order(&self) -> Vec<&CanvasElement> {
        self.z_sorted_indices()
            .into_iter()
            .map(|i| &self.elements[i])
            .collect()
    }

    /// All text elements, in insertion order.
    pub fn text_blocks(&self) -> impl Iterator<Item = &CanvasElement> {
        self.elements.iter().filter(|e| e.is_text())
    }

    /// Reassigns z-indices to a dense 0..N-1 run preserving paint order.
    /// Called after structural changes to keep values from drifting.
    pub(crate) fn renormalize_z(&mut self) {
        let order = self.z_sorted_indices();
        for (z, idx) in order.into_iter().enumerate() {
            self.elements[idx].z_index = z as i64;
        }
    }
}

/// An ordered run of pages within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Uuid,
    pub title: String,
    /// Creation order within the project.
    pub index: u32,
    pub pages: Vec<Arc<Page>>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            index,
            pages: Vec::new(),
        }
    }

    pub fn page(&self, id: Uuid) -> Option<&Arc<Page>> {
        self.pages.iter().find(|p| p.id == id)
    }
}

/// A localization project: one source work being translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub cover_url: Option<String>,
    pub chapters: Vec<Arc<Chapter>>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            cover_url: None,
            chapters: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn chapter(&self, id: Uuid) -> Option<&Arc<Chapter>> {
        self.chapters.iter().find(|c| c.id == id)
    }
}

/// Partial update for project metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub cover_url: Option<String>,
}

/// Partial update for chapter metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterPatch {
    pub title: Option<String>,
}

/// Partial update for page state. Width/height are deliberately absent:
/// logical canvas size is fixed once element geometry has been computed
/// against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagePatch {
    pub cleaned_url: Option<String>,
    pub is_processed: Option<bool>,
    pub is_ocred: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_order_breaks_ties_by_insertion() {
        let mut page = Page::new("p.png", 1, 800.0, 1200.0);
        let mut a = CanvasElement::text("a", 0.0, 0.0, 10.0, 10.0);
        let mut b = CanvasElement::text("b", 0.0, 0.0, 10.0, 10.0);
        a.z_index = 3;
        b.z_index = 3;
        let (a_id, b_id) = (a.id, b.id);
        page.elements.push(a);
        page.elements.push(b);

        let order: Vec<Uuid> = page.elements_in_paint_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![a_id, b_id]);
    }

    #[test]
    fn renormalize_preserves_relative_order() {
        let mut page = Page::new("p.png", 1, 800.0, 1200.0);
        for z in [42, -7, 100] {
            let mut el = CanvasElement::text("t", 0.0, 0.0, 10.0, 10.0);
            el.z_index = z;
            page.elements.push(el);
        }
        let before: Vec<Uuid> = page.elements_in_paint_order().iter().map(|e| e.id).collect();
        page.renormalize_z();
        let after: Vec<Uuid> = page.elements_in_paint_order().iter().map(|e| e.id).collect();
        assert_eq!(before, after);

        let mut zs: Vec<i64> = page.elements.iter().map(|e| e.z_index).collect();
        zs.sort_unstable();
        assert_eq!(zs, vec![0, 1, 2]);
    }
}
