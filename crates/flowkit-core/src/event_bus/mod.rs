//! # Event Bus Module
//!
//! Provides a synchronous publish/subscribe bus for decoupled communication
//! between the diagram core and its external collaborators (renderer,
//! auto-save, toasts).
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Delivery is synchronous: handlers run inside `publish`, so the host
//!   decides whether to defer work (e.g. debounce persistence)
//!
//! ## Usage
//!
//! ```rust
//! use flowkit_core::event_bus::{DiagramEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Selection]),
//!     |event| {
//!         if let DiagramEvent::Selection(sel) = event {
//!             println!("Selection event: {:?}", sel);
//!         }
//!     },
//! );
//!
//! // ... publish from the diagram core ...
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
