//! Error handling for FlowKit
//!
//! Mutation-contract violations are surfaced as `DiagramError` values so a
//! rejected operation never partially applies and never aborts an in-progress
//! gesture. Geometry problems are not represented here at all: routing and
//! hit-testing degrade to zero values and log instead of failing.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Diagram mutation error type
///
/// Represents rejected mutation requests: references to elements that do not
/// exist, duplicate connections, and edits to protected decision-branch
/// transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    /// No node with the given id exists in the store
    #[error("No node with id {id}")]
    UnknownNode {
        /// The missing node id.
        id: u64,
    },

    /// No transition with the given id exists in the store
    #[error("No transition with id {id}")]
    UnknownTransition {
        /// The missing transition id.
        id: u64,
    },

    /// No text label with the given id exists in the store
    #[error("No text with id {id}")]
    UnknownText {
        /// The missing text id.
        id: u64,
    },

    /// A transition between the same ordered (from, to) pair already exists
    #[error("A transition from node {from} to node {to} already exists")]
    DuplicateTransition {
        /// The source node id of the rejected transition.
        from: u64,
        /// The destination node id of the rejected transition.
        to: u64,
    },

    /// The operation is not allowed on a decision-branch transition
    #[error("Transition {id} is a decision branch and cannot be {action}")]
    ProtectedTransition {
        /// The branch transition id.
        id: u64,
        /// What was attempted ("deleted", "restyled", "given break points").
        action: &'static str,
    },

    /// A decision-node operation was requested on a non-decision node
    #[error("Node {id} is not a decision node")]
    NotADecisionNode {
        /// The offending node id.
        id: u64,
    },

    /// A break-point index was outside the transition's break-point sequence
    #[error("Break point index {index} out of range (len {len})")]
    BreakPointOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of break points on the transition.
        len: usize,
    },
}

/// Result alias for diagram mutations.
pub type Result<T> = std::result::Result<T, DiagramError>;
