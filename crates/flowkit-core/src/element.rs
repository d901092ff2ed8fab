//! Element identity shared by selection, events, and the state machine.

use serde::{Deserialize, Serialize};

/// Kind of a diagram element.
///
/// Every element in the diagram is addressed as a (kind, id) pair; ids are
/// unique across kinds because they come from a single generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// A shaped node.
    Node,
    /// A free-floating text label.
    Text,
    /// A directed transition between two nodes.
    Transition,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Text => write!(f, "text"),
            ElementKind::Transition => write!(f, "transition"),
        }
    }
}
