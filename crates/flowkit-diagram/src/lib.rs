//! Geometry and interaction core for an interactive flowchart editor.
//!
//! This crate is headless: it owns the element model, shape-aware
//! hit-testing, connection routing, break-point paths, arrow placement,
//! and the pointer-driven selection/drag state machine, and publishes
//! changes on an event bus. Rendering, text editing, and persistence I/O
//! belong to the host application.
//!
//! The [`Diagram`] facade is the main entry point; the lower-level modules
//! are public for hosts that need direct access.

pub mod arrows;
pub mod diagram;
pub mod interaction;
pub mod model;
pub mod path;
pub mod routing;
pub mod selection;
pub mod serialization;
pub mod store;

pub use arrows::{arrowheads, position_at_fraction, ArrowPlacement};
pub use diagram::{DecisionHandles, Diagram};
pub use interaction::{DragState, InteractionConfig, InteractionController, Modifiers};
pub use model::{
    AnchorCorner, ArrowMode, Bounds, BranchSlot, Node, NodeShape, Orientation, Point, TextLabel,
    Transition, TransitionKind, TransitionStyle,
};
pub use routing::{connection_points, ConnectionPoints};
pub use selection::{ElementRef, GroupSnapshot, MultiSelection};
pub use serialization::{from_json, to_json, DiagramDocument};
pub use store::DiagramStore;

pub use flowkit_core::{DiagramError, ElementKind, Result};
