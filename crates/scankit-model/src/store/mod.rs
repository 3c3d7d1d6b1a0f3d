//! Document store for editor integration.
//! Owns the project tree, the open-project/chapter/page cursor, and the
//! active selection, and publishes every applied mutation on its event bus.
//!
//! This module is split into submodules for better organization:
//! - `pages`: page CRUD and reordering
//! - `elements`: canvas element CRUD, z-order, selection
//!
//! Every mutation follows the same shape: locate the target, rebuild the
//! path from the changed entity up to its project into fresh `Arc`s
//! (siblings stay shared), then publish a `DocumentEvent`. Mutations
//! against unknown ids are quiet no-ops that return `false` and log at
//! debug level; nothing in this store panics on bad input.

mod elements;
mod pages;

use std::sync::Arc;

use uuid::Uuid;

use scankit_core::event_bus::{AppEvent, DocumentEvent, EventBus, SelectionEvent, SelectionOrigin};

use crate::element::CanvasElement;
use crate::entities::{Chapter, ChapterPatch, Page, Project, ProjectPatch};

/// Editing tools selectable on the canvas toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Select,
    Text,
    Pan,
    Zoom,
    Rect,
    Circle,
    Triangle,
}

/// In-memory working copy of all documents plus editor cursor state.
#[derive(Debug)]
pub struct DocumentStore {
    projects: Vec<Arc<Project>>,
    current_project: Option<Uuid>,
    current_chapter: Option<Uuid>,
    current_page: Option<Uuid>,
    selected_element: Option<Uuid>,
    active_tool: EditorTool,
    show_original_layer: bool,
    events: EventBus,
}

impl DocumentStore {
    /// Creates an empty store with its own event bus.
    pub fn new() -> Self {
        Self::with_events(EventBus::new())
    }

    /// Creates an empty store publishing on the given bus.
    pub fn with_events(events: EventBus) -> Self {
        Self {
            projects: Vec::new(),
            current_project: None,
            current_chapter: None,
            current_page: None,
            selected_element: None,
            active_tool: EditorTool::default(),
            show_original_layer: true,
            events,
        }
    }

    /// The toolbar tool currently active in the editor.
    pub fn active_tool(&self) -> EditorTool {
        self.active_tool
    }

    pub fn set_active_tool(&mut self, tool: EditorTool) {
        self.active_tool = tool;
    }

    /// Whether the original (un-inpainted) layer is shown under the
    /// cleaned artwork.
    pub fn show_original_layer(&self) -> bool {
        self.show_original_layer
    }

    pub fn toggle_original_layer(&mut self) {
        self.show_original_layer = !self.show_original_layer;
    }

    /// The bus this store publishes mutations on.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn projects(&self) -> &[Arc<Project>] {
        &self.projects
    }

    pub fn project(&self, id: Uuid) -> Option<&Arc<Project>> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn chapter(&self, id: Uuid) -> Option<&Arc<Chapter>> {
        self.projects.iter().find_map(|p| p.chapter(id))
    }

    pub fn page(&self, id: Uuid) -> Option<&Arc<Page>> {
        self.projects
            .iter()
            .flat_map(|p| p.chapters.iter())
            .find_map(|c| c.page(id))
    }

    /// The project owning a chapter.
    pub fn project_for_chapter(&self, chapter_id: Uuid) -> Option<&Arc<Project>> {
        self.projects
            .iter()
            .find(|p| p.chapter(chapter_id).is_some())
    }

    pub fn current_project(&self) -> Option<&Arc<Project>> {
        self.current_project.and_then(|id| self.project(id))
    }

    pub fn current_chapter(&self) -> Option<&Arc<Chapter>> {
        self.current_chapter.and_then(|id| self.chapter(id))
    }

    pub fn current_page(&self) -> Option<&Arc<Page>> {
        self.current_page.and_then(|id| self.page(id))
    }

    pub fn selected_element_id(&self) -> Option<Uuid> {
        self.selected_element
    }

    pub fn selected_element(&self) -> Option<&CanvasElement> {
        let id = self.selected_element?;
        self.current_page()?.element(id)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Opens a project (or closes the current one with `None`). Closes any
    /// open chapter/page and clears the selection.
    pub fn open_project(&mut self, id: Option<Uuid>) -> bool {
        if let Some(id) = id {
            if self.project(id).is_none() {
                tracing::debug!(%id, "open_project: unknown project");
                return false;
            }
        }
        self.current_project = id;
        self.current_chapter = None;
        self.current_page = None;
        self.set_selection(None, SelectionOrigin::FromModel);
        true
    }

    /// Opens a chapter, making its owning project current.
    pub fn open_chapter(&mut self, id: Option<Uuid>) -> bool {
        if let Some(id) = id {
            let Some((pi, _)) = self.locate_chapter(id) else {
                tracing::debug!(%id, "open_chapter: unknown chapter");
                return false;
            };
            self.current_project = Some(self.projects[pi].id);
        }
        self.current_chapter = id;
        self.current_page = None;
        self.set_selection(None, SelectionOrigin::FromModel);
        true
    }

    /// Opens a page, making its owning chapter and project current.
    /// Always clears the selection.
    pub fn open_page(&mut self, id: Option<Uuid>) -> bool {
        if let Some(id) = id {
            let Some((pi, ci, _)) = self.locate_page(id) else {
                tracing::debug!(%id, "open_page: unknown page");
                return false;
            };
            self.current_project = Some(self.projects[pi].id);
            self.current_chapter = Some(self.projects[pi].chapters[ci].id);
        }
        self.current_page = id;
        self.set_selection(None, SelectionOrigin::FromModel);
        true
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Creates a project and returns its id.
    pub fn create_project(
        &mut self,
        name: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Uuid {
        let project = Project::new(name, source_lang, target_lang);
        let id = project.id;
        self.projects.push(Arc::new(project));
        self.publish_doc(DocumentEvent::ProjectCreated { project_id: id });
        id
    }

    /// Inserts a fully-formed project (a snapshot loaded from the
    /// persistence boundary) into the working copy.
    pub fn insert_project(&mut self, project: Project) -> Uuid {
        let id = project.id;
        self.projects.push(Arc::new(project));
        self.publish_doc(DocumentEvent::ProjectCreated { project_id: id });
        id
    }

    /// Applies a metadata patch to a project.
    pub fn update_project(&mut self, id: Uuid, patch: ProjectPatch) -> bool {
        let applied = self.with_project(id, |project| {
            if let Some(name) = patch.name {
                project.name = name;
            }
            if let Some(description) = patch.description {
                project.description = Some(description);
            }
            if let Some(lang) = patch.source_lang {
                project.source_lang = lang;
            }
            if let Some(lang) = patch.target_lang {
                project.target_lang = lang;
            }
            if let Some(url) = patch.cover_url {
                project.cover_url = Some(url);
            }
        });
        if applied {
            self.publish_doc(DocumentEvent::ProjectUpdated { project_id: id });
        }
        applied
    }

    /// Deletes a project and everything it owns.
    pub fn delete_project(&mut self, id: Uuid) -> bool {
        let Some(pi) = self.locate_project(id) else {
            tracing::debug!(%id, "delete_project: unknown project");
            return false;
        };
        self.projects.remove(pi);
        if self.current_project == Some(id) {
            self.current_project = None;
            self.current_chapter = None;
            self.current_page = None;
            self.set_selection(None, SelectionOrigin::FromModel);
        }
        self.publish_doc(DocumentEvent::ProjectDeleted { project_id: id });
        true
    }

    // ------------------------------------------------------------------
    // Chapters
    // ------------------------------------------------------------------

    /// Appends a chapter to a project and returns its id.
    pub fn create_chapter(&mut self, project_id: Uuid, title: impl Into<String>) -> Option<Uuid> {
        let title = title.into();
        let mut chapter_id = None;
        let applied = self.with_project(project_id, |project| {
            let chapter = Chapter::new(title, project.chapters.len() as u32);
            chapter_id = Some(chapter.id);
            project.chapters.push(Arc::new(chapter));
        });
        if !applied {
            tracing::debug!(%project_id, "create_chapter: unknown project");
            return None;
        }
        let chapter_id = chapter_id?;
        self.publish_doc(DocumentEvent::ChapterCreated {
            project_id,
            chapter_id,
        });
        Some(chapter_id)
    }

    /// Applies a metadata patch to a chapter.
    pub fn update_chapter(&mut self, id: Uuid, patch: ChapterPatch) -> bool {
        let applied = self.with_chapter(id, |chapter| {
            if let Some(title) = patch.title {
                chapter.title = title;
            }
        });
        if applied {
            self.publish_doc(DocumentEvent::ChapterUpdated { chapter_id: id });
        }
        applied
    }

    /// Deletes a chapter and all of its pages.
    pub fn delete_chapter(&mut self, id: Uuid) -> bool {
        let Some((pi, ci)) = self.locate_chapter(id) else {
            tracing::debug!(%id, "delete_chapter: unknown chapter");
            return false;
        };
        let project_id = self.projects[pi].id;
        self.with_project(project_id, |project| {
            project.chapters.remove(ci);
        });
        if self.current_chapter == Some(id) {
            self.current_chapter = None;
            self.current_page = None;
            self.set_selection(None, SelectionOrigin::FromModel);
        }
        self.publish_doc(DocumentEvent::ChapterDeleted { chapter_id: id });
        true
    }

    // ------------------------------------------------------------------
    // Copy-on-write plumbing
    // ------------------------------------------------------------------

    pub(crate) fn locate_project(&self, id: Uuid) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    pub(crate) fn locate_chapter(&self, id: Uuid) -> Option<(usize, usize)> {
        self.projects.iter().enumerate().find_map(|(pi, p)| {
            p.chapters
                .iter()
                .position(|c| c.id == id)
                .map(|ci| (pi, ci))
        })
    }

    pub(crate) fn locate_page(&self, id: Uuid) -> Option<(usize, usize, usize)> {
        self.projects.iter().enumerate().find_map(|(pi, p)| {
            p.chapters.iter().enumerate().find_map(|(ci, c)| {
                c.pages.iter().position(|g| g.id == id).map(|gi| (pi, ci, gi))
            })
        })
    }

    /// Rebuilds one project through `f`. Returns false for unknown ids.
    pub(crate) fn with_project(&mut self, id: Uuid, f: impl FnOnce(&mut Project)) -> bool {
        let Some(pi) = self.locate_project(id) else {
            return false;
        };
        let mut project = Project::clone(&self.projects[pi]);
        f(&mut project);
        self.projects[pi] = Arc::new(project);
        true
    }

    /// Rebuilds one chapter and its ancestor project through `f`.
    pub(crate) fn with_chapter(&mut self, id: Uuid, f: impl FnOnce(&mut Chapter)) -> bool {
        let Some((pi, ci)) = self.locate_chapter(id) else {
            return false;
        };
        let mut project = Project::clone(&self.projects[pi]);
        let mut chapter = Chapter::clone(&project.chapters[ci]);
        f(&mut chapter);
        project.chapters[ci] = Arc::new(chapter);
        self.projects[pi] = Arc::new(project);
        true
    }

    /// Rebuilds one page and its ancestors through `f`. This is the hot
    /// path: every element mutation funnels through here, producing the
    /// fresh `Arc<Page>` the scene synchronizer compares against.
    pub(crate) fn with_page(&mut self, id: Uuid, f: impl FnOnce(&mut Page)) -> bool {
        let Some((pi, ci, gi)) = self.locate_page(id) else {
            return false;
        };
        let mut project = Project::clone(&self.projects[pi]);
        let mut chapter = Chapter::clone(&project.chapters[ci]);
        let mut page = Page::clone(&chapter.pages[gi]);
        f(&mut page);
        chapter.pages[gi] = Arc::new(page);
        project.chapters[ci] = Arc::new(chapter);
        self.projects[pi] = Arc::new(project);
        true
    }

    pub(crate) fn publish_doc(&self, event: DocumentEvent) {
        self.events.publish(AppEvent::Document(event));
    }

    /// Updates the selection field and publishes the transition with its
    /// origin. Idempotent: re-selecting the current selection is silent.
    pub(crate) fn set_selection(&mut self, id: Option<Uuid>, origin: SelectionOrigin) {
        if self.selected_element == id {
            return;
        }
        self.selected_element = id;
        self.events.publish(AppEvent::Selection(SelectionEvent::Changed {
            element_id: id,
            origin,
        }));
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
