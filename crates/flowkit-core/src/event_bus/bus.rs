//! Event Bus implementation.
//!
//! Provides the core EventBus struct. The bus is instantiable and owned by
//! the diagram, not a process-wide global, so hosts can run several diagrams
//! side by side. Delivery is synchronous: the core performs no suspension.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::events::{DiagramEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &DiagramEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(&DiagramEvent) + Send + Sync>;

/// Synchronous event bus for diagram mutation notifications
#[derive(Clone, Default)]
pub struct EventBus {
    /// Registered handlers, keyed by subscription
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
}

impl EventBus {
    /// Create a new event bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching the filter
    ///
    /// The handler runs synchronously inside `publish`, on the publishing
    /// thread. Returns a handle for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&DiagramEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers
            .write()
            .insert(id, (filter, Box::new(handler)));
        tracing::debug!(subscription = %id, "event bus subscription added");
        id
    }

    /// Remove a subscription; returns `true` if it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers.write().remove(&id).is_some()
    }

    /// Publish an event to all matching subscribers
    ///
    /// Returns the number of handlers that received the event. Publishing
    /// with no subscribers is not an error: notifications are fire-and-forget.
    pub fn publish(&self, event: DiagramEvent) -> usize {
        tracing::trace!(category = %event.category(), "{}", event.description());
        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (filter, handler) in handlers.values() {
            if filter.matches(&event) {
                handler(&event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
