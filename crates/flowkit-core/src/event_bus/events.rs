//! Event type definitions for the event bus.
//!
//! This module defines all diagram events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;

/// Root event enum for all diagram events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiagramEvent {
    /// Selection state changes
    Selection(SelectionEvent),
    /// Data-model mutations
    Mutation(MutationEvent),
    /// Pointer-gesture lifecycle events
    Gesture(GestureEvent),
}

impl DiagramEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            DiagramEvent::Selection(_) => EventCategory::Selection,
            DiagramEvent::Mutation(_) => EventCategory::Mutation,
            DiagramEvent::Gesture(_) => EventCategory::Gesture,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            DiagramEvent::Selection(e) => e.description(),
            DiagramEvent::Mutation(e) => e.description(),
            DiagramEvent::Gesture(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection state events.
    Selection,
    /// Data-model mutation events.
    Mutation,
    /// Pointer-gesture lifecycle events.
    Gesture,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Mutation => write!(f, "Mutation"),
            EventCategory::Gesture => write!(f, "Gesture"),
        }
    }
}

/// Selection state changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// A single element became the selection
    SingleSelected {
        /// Kind of the selected element.
        kind: ElementKind,
        /// Id of the selected element.
        id: u64,
    },
    /// Both single and multi selection are now empty
    Cleared,
    /// The multi-selection membership changed
    MultiChanged {
        /// Number of elements now in the multi-selection.
        count: usize,
    },
}

impl SelectionEvent {
    /// Short description for logging
    pub fn description(&self) -> String {
        match self {
            SelectionEvent::SingleSelected { kind, id } => format!("selected {kind} {id}"),
            SelectionEvent::Cleared => "selection cleared".to_string(),
            SelectionEvent::MultiChanged { count } => {
                format!("multi-selection now holds {count} element(s)")
            }
        }
    }
}

/// Data-model mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MutationEvent {
    /// An element was created
    ElementCreated {
        /// Kind of the created element.
        kind: ElementKind,
        /// Id of the created element.
        id: u64,
    },
    /// An element was deleted (cascade deletions emit one event per element)
    ElementDeleted {
        /// Kind of the deleted element.
        kind: ElementKind,
        /// Id of the deleted element.
        id: u64,
    },
    /// An element was moved by a drag or a move command
    ElementMoved {
        /// Kind of the moved element.
        kind: ElementKind,
        /// Id of the moved element.
        id: u64,
        /// Total x displacement of the gesture.
        dx: f64,
        /// Total y displacement of the gesture.
        dy: f64,
    },
    /// A transition's break-point sequence changed (insert/remove/clear)
    BreakPointsChanged {
        /// The owning transition id.
        transition: u64,
    },
    /// One or more break points of a transition were moved
    BreakPointsMoved {
        /// The owning transition id.
        transition: u64,
    },
    /// A transition's style or arrow mode changed
    TransitionRestyled {
        /// The transition id.
        id: u64,
    },
    /// A decision node was rotated 90 degrees
    NodeRotated {
        /// The decision node id.
        id: u64,
        /// The new orientation in degrees.
        degrees: u16,
    },
    /// An element's label changed
    LabelChanged {
        /// Kind of the relabeled element.
        kind: ElementKind,
        /// Id of the relabeled element.
        id: u64,
    },
    /// A node's fill color changed
    ColorChanged {
        /// The node id.
        id: u64,
    },
    /// All elements were removed
    DiagramCleared,
}

impl MutationEvent {
    /// Short description for logging
    pub fn description(&self) -> String {
        match self {
            MutationEvent::ElementCreated { kind, id } => format!("created {kind} {id}"),
            MutationEvent::ElementDeleted { kind, id } => format!("deleted {kind} {id}"),
            MutationEvent::ElementMoved { kind, id, dx, dy } => {
                format!("moved {kind} {id} by ({dx:.1}, {dy:.1})")
            }
            MutationEvent::BreakPointsChanged { transition } => {
                format!("break points of transition {transition} changed")
            }
            MutationEvent::BreakPointsMoved { transition } => {
                format!("break points of transition {transition} moved")
            }
            MutationEvent::TransitionRestyled { id } => format!("transition {id} restyled"),
            MutationEvent::NodeRotated { id, degrees } => {
                format!("node {id} rotated to {degrees} degrees")
            }
            MutationEvent::LabelChanged { kind, id } => format!("label of {kind} {id} changed"),
            MutationEvent::ColorChanged { id } => format!("color of node {id} changed"),
            MutationEvent::DiagramCleared => "diagram cleared".to_string(),
        }
    }
}

/// Pointer-gesture lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GestureEvent {
    /// A group drag finished
    GroupMoved {
        /// Number of elements translated together.
        count: usize,
        /// Total x displacement of the gesture.
        dx: f64,
        /// Total y displacement of the gesture.
        dy: f64,
    },
    /// Connection drawing started from a node
    ConnectionStarted {
        /// The source node id.
        from: u64,
    },
    /// Connection drawing was aborted (escape or empty-space click)
    ConnectionCancelled,
    /// Connection drawing completed and created a transition
    ConnectionCompleted {
        /// The created transition id.
        transition: u64,
    },
}

impl GestureEvent {
    /// Short description for logging
    pub fn description(&self) -> String {
        match self {
            GestureEvent::GroupMoved { count, dx, dy } => {
                format!("group of {count} moved by ({dx:.1}, {dy:.1})")
            }
            GestureEvent::ConnectionStarted { from } => {
                format!("connection drawing started from node {from}")
            }
            GestureEvent::ConnectionCancelled => "connection drawing cancelled".to_string(),
            GestureEvent::ConnectionCompleted { transition } => {
                format!("connection completed as transition {transition}")
            }
        }
    }
}
