//! # FlowKit Core
//!
//! Core types, traits, and utilities for FlowKit.
//! Provides the fundamental abstractions shared by the diagram model and
//! interaction layers: error taxonomy, element identity, id generation,
//! tuning constants, and the event bus used for mutation notifications.

pub mod constants;
pub mod element;
pub mod error;
pub mod event_bus;
pub mod id;

pub use element::ElementKind;
pub use error::{DiagramError, Result};
pub use event_bus::{
    DiagramEvent, EventBus, EventCategory, EventFilter, GestureEvent, MutationEvent,
    SelectionEvent, SubscriptionId,
};
pub use id::IdGenerator;
