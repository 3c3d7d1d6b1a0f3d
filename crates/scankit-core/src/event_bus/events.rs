//! Event type definitions for the event bus.
//!
//! This module defines all application events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Document tree mutations
    Document(DocumentEvent),
    /// Editor selection changes
    Selection(SelectionEvent),
    /// Chapter processing pipeline progress
    Pipeline(PipelineEvent),
    /// Transient user-facing notifications
    Notification(NotificationEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Document(_) => EventCategory::Document,
            AppEvent::Selection(_) => EventCategory::Selection,
            AppEvent::Pipeline(_) => EventCategory::Pipeline,
            AppEvent::Notification(_) => EventCategory::Notification,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Document(e) => e.description(),
            AppEvent::Selection(e) => e.description(),
            AppEvent::Pipeline(e) => e.description(),
            AppEvent::Notification(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Document tree mutation events.
    Document,
    /// Selection change events.
    Selection,
    /// Pipeline progress events.
    Pipeline,
    /// Transient notification events.
    Notification,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Document => write!(f, "Document"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Pipeline => write!(f, "Pipeline"),
            EventCategory::Notification => write!(f, "Notification"),
        }
    }
}

/// Where a selection change originated.
///
/// Selection updates flow both from the model (side panels, programmatic
/// selection) and from the rendering surface (pointer interaction). The
/// origin is carried on every transition so the scene synchronizer can
/// ignore the echo of its own writes without timing-dependent guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOrigin {
    /// The change was requested through the document store API.
    FromModel,
    /// The change was reported by the rendering surface.
    FromSurface,
}

/// Document tree mutation events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A project was created.
    ProjectCreated { project_id: Uuid },
    /// Project metadata changed.
    ProjectUpdated { project_id: Uuid },
    /// A project and all of its chapters were removed.
    ProjectDeleted { project_id: Uuid },
    /// A chapter was appended to a project.
    ChapterCreated { project_id: Uuid, chapter_id: Uuid },
    /// Chapter metadata changed.
    ChapterUpdated { chapter_id: Uuid },
    /// A chapter and all of its pages were removed.
    ChapterDeleted { chapter_id: Uuid },
    /// A page was appended to a chapter.
    PageAdded { chapter_id: Uuid, page_id: Uuid },
    /// Page fields changed (cleaned image, flags, ...).
    PageUpdated { page_id: Uuid },
    /// A page was removed.
    PageDeleted { page_id: Uuid },
    /// Pages were reordered and renumbered within a chapter.
    PagesReordered { chapter_id: Uuid },
    /// The element list of a page changed structurally (add/remove/z-order).
    ElementsChanged { page_id: Uuid },
    /// A single element's properties changed.
    ElementUpdated { page_id: Uuid, element_id: Uuid },
}

impl DocumentEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            DocumentEvent::ProjectCreated { project_id } => {
                format!("Project {} created", project_id)
            }
            DocumentEvent::ProjectUpdated { project_id } => {
                format!("Project {} updated", project_id)
            }
            DocumentEvent::ProjectDeleted { project_id } => {
                format!("Project {} deleted", project_id)
            }
            DocumentEvent::ChapterCreated { chapter_id, .. } => {
                format!("Chapter {} created", chapter_id)
            }
            DocumentEvent::ChapterUpdated { chapter_id } => {
                format!("Chapter {} updated", chapter_id)
            }
            DocumentEvent::ChapterDeleted { chapter_id } => {
                format!("Chapter {} deleted", chapter_id)
            }
            DocumentEvent::PageAdded { page_id, .. } => format!("Page {} added", page_id),
            DocumentEvent::PageUpdated { page_id } => format!("Page {} updated", page_id),
            DocumentEvent::PageDeleted { page_id } => format!("Page {} deleted", page_id),
            DocumentEvent::PagesReordered { chapter_id } => {
                format!("Pages reordered in chapter {}", chapter_id)
            }
            DocumentEvent::ElementsChanged { page_id } => {
                format!("Elements changed on page {}", page_id)
            }
            DocumentEvent::ElementUpdated { element_id, .. } => {
                format!("Element {} updated", element_id)
            }
        }
    }
}

/// Selection change events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The active selection changed to the given element (or was cleared).
    Changed {
        element_id: Option<Uuid>,
        origin: SelectionOrigin,
    },
}

impl SelectionEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { element_id, origin } => match element_id {
                Some(id) => format!("Selection changed to {} ({:?})", id, origin),
                None => format!("Selection cleared ({:?})", origin),
            },
        }
    }
}

/// Chapter processing pipeline events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Processing started for a chapter.
    Started { chapter_id: Uuid, total: usize },
    /// A page finished processing ("page index of total").
    PageProcessed {
        page_id: Uuid,
        index: usize,
        total: usize,
    },
    /// A page failed; the run continues with the next page.
    PageFailed {
        page_id: Uuid,
        index: usize,
        total: usize,
        reason: String,
    },
    /// Processing finished.
    Finished { processed: usize, failed: usize },
}

impl PipelineEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            PipelineEvent::Started { total, .. } => format!("Processing {} pages", total),
            PipelineEvent::PageProcessed { index, total, .. } => {
                format!("Processed page {} of {}", index, total)
            }
            PipelineEvent::PageFailed {
                index,
                total,
                reason,
                ..
            } => format!("Page {} of {} failed: {}", index, total, reason),
            PipelineEvent::Finished { processed, failed } => {
                format!("Finished: {} processed, {} failed", processed, failed)
            }
        }
    }
}

/// Transient user-facing notification events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationEvent {
    /// A non-fatal failure the user should see as a one-line notice.
    Warning { message: String },
    /// An informational notice.
    Info { message: String },
}

impl NotificationEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            NotificationEvent::Warning { message } => format!("Warning: {}", message),
            NotificationEvent::Info { message } => format!("Info: {}", message),
        }
    }
}
