//! Page operations: upload-time append, state patches, deletion, and
//! reorder-with-renumber.

use uuid::Uuid;

use scankit_core::event_bus::{DocumentEvent, SelectionOrigin};

use super::DocumentStore;
use crate::entities::{Page, PagePatch};

impl DocumentStore {
    /// Appends a page to a chapter and returns its id. The logical size
    /// is taken from the decoded source image and never changes again.
    pub fn add_page(
        &mut self,
        chapter_id: Uuid,
        original_url: impl Into<String>,
        width: f64,
        height: f64,
    ) -> Option<Uuid> {
        let original_url = original_url.into();
        let mut page_id = None;
        let applied = self.with_chapter(chapter_id, |chapter| {
            let page = Page::new(original_url, chapter.pages.len() as u32 + 1, width, height);
            page_id = Some(page.id);
            chapter.pages.push(std::sync::Arc::new(page));
        });
        if !applied {
            tracing::debug!(%chapter_id, "add_page: unknown chapter");
            return None;
        }
        let page_id = page_id?;
        self.publish_doc(DocumentEvent::PageAdded {
            chapter_id,
            page_id,
        });
        Some(page_id)
    }

    /// Applies a state patch to a page (cleaned image, processing flags).
    pub fn update_page(&mut self, page_id: Uuid, patch: PagePatch) -> bool {
        let applied = self.with_page(page_id, |page| {
            if let Some(url) = patch.cleaned_url {
                page.cleaned_url = Some(url);
            }
            if let Some(processed) = patch.is_processed {
                page.is_processed = processed;
            }
            if let Some(ocred) = patch.is_ocred {
                page.is_ocred = ocred;
            }
        });
        if applied {
            self.publish_doc(DocumentEvent::PageUpdated { page_id });
        } else {
            tracing::debug!(%page_id, "update_page: unknown page");
        }
        applied
    }

    /// Deletes a page and its elements.
    pub fn delete_page(&mut self, page_id: Uuid) -> bool {
        let Some((pi, ci, gi)) = self.locate_page(page_id) else {
            tracing::debug!(%page_id, "delete_page: unknown page");
            return false;
        };
        let chapter_id = self.projects[pi].chapters[ci].id;
        self.with_chapter(chapter_id, |chapter| {
            chapter.pages.remove(gi);
        });
        if self.current_page == Some(page_id) {
            self.current_page = None;
            self.set_selection(None, SelectionOrigin::FromModel);
        }
        self.publish_doc(DocumentEvent::PageDeleted { page_id });
        true
    }

    /// Repositions a page within its chapter and renumbers all pages
    /// sequentially from 1. Out-of-range indices leave the chapter
    /// untouched.
    pub fn move_page(&mut self, chapter_id: Uuid, from_index: usize, to_index: usize) -> bool {
        let Some(chapter) = self.chapter(chapter_id) else {
            tracing::debug!(%chapter_id, "move_page: unknown chapter");
            return false;
        };
        let len = chapter.pages.len();
        if from_index >= len || to_index >= len {
            return false;
        }

        self.with_chapter(chapter_id, |chapter| {
            let page = chapter.pages.remove(from_index);
            chapter.pages.insert(to_index, page);
            for (i, page) in chapter.pages.iter_mut().enumerate() {
                let mut renumbered = Page::clone(page);
                renumbered.page_number = i as u32 + 1;
                *page = std::sync::Arc::new(renumbered);
            }
        });
        self.publish_doc(DocumentEvent::PagesReordered { chapter_id });
        true
    }
}
