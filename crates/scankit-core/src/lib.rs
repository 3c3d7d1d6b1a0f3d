//! # ScanKit Core
//!
//! Core types, errors, and utilities shared by every ScanKit crate.
//! Provides the error taxonomy, the application event bus, shared
//! constants, and callback type aliases.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod quality;
pub mod types;

pub use error::{Error, ExportError, Result, ServiceError};
pub use quality::ExportQuality;

pub use event_bus::{
    AppEvent, DocumentEvent, EventBus, EventBusConfig, EventCategory, EventFilter,
    NotificationEvent, PipelineEvent, SelectionEvent, SelectionOrigin, SubscriptionId,
};

pub use types::ProgressCallback;
