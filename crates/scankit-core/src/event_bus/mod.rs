//! # Event Bus Module
//!
//! Provides a unified event bus for decoupled communication between
//! application components.
//!
//! ## Overview
//!
//! The event bus enables publish/subscribe patterns across the application:
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Supports both sync handlers and async broadcast receivers
//!
//! Unlike a process-wide singleton, every bus is explicitly constructed
//! and owned (normally by a `DocumentStore`) and passed by reference to
//! whoever needs to observe it.
//!
//! ## Usage
//!
//! ```rust
//! use scankit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, NotificationEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Notification]),
//!     |event| {
//!         if let AppEvent::Notification(n) = event {
//!             println!("{}", n.description());
//!         }
//!     },
//! );
//!
//! bus.publish(AppEvent::Notification(NotificationEvent::Info {
//!     message: "2 pages imported".to_string(),
//! }));
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
