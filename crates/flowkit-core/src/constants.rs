//! Shared tuning constants for the diagram interaction core.
//!
//! All distances are in diagram units (1 unit = 1 logical pixel at 100%
//! zoom). The coordinate system is screen style: y grows downward.

/// Maximum point-to-path distance at which a transition body counts as hit.
pub const HIT_TOLERANCE: f64 = 15.0;

/// Maximum distance at which `remove_break_point` removes the nearest
/// break point; further away the call is a no-op.
pub const BREAK_POINT_REMOVE_RADIUS: f64 = 15.0;

/// Displacement (per axis) after which a pending transition press is
/// promoted from a click to a drag.
pub const DRAG_PROMOTION_THRESHOLD: f64 = 5.0;

/// Displacement below which a completed drag is logged as a plain click.
/// Cosmetic only; never affects state.
pub const MOVE_LOG_THRESHOLD: f64 = 2.0;

/// Margin kept between a dragged break point and the canvas edge.
pub const CANVAS_MARGIN: f64 = 10.0;

/// Length of the first (outward) segment of a decision-branch arm.
pub const BRANCH_ARM_LENGTH: f64 = 60.0;

/// Radial distance of a decision node's branch targets after a rotation.
pub const BRANCH_TARGET_DISTANCE: f64 = 120.0;

/// Horizontal semi-axis of a terminal node's ellipse, as a factor of the
/// node radius.
pub const TERMINAL_SEMI_AXIS_X: f64 = 1.5;

/// Vertical semi-axis of a terminal node's ellipse, as a factor of the
/// node radius.
pub const TERMINAL_SEMI_AXIS_Y: f64 = 0.8;

/// Width of a data-model node's box, as a factor of the node radius.
pub const DATA_MODEL_WIDTH_FACTOR: f64 = 3.5;

/// Height contributed by each field row of a data-model node.
pub const DATA_MODEL_ROW_HEIGHT: f64 = 18.0;

/// Fixed height of a data-model node's header area.
pub const DATA_MODEL_HEADER_HEIGHT: f64 = 45.0;

/// Path fraction at which the forward arrowhead sits.
pub const ARROW_HEAD_FRACTION: f64 = 0.9;

/// Path fraction at which the reverse arrowhead of a bidirectional
/// transition sits.
pub const ARROW_TAIL_FRACTION: f64 = 0.1;

/// Approximate advance width of one label character, for hit boxes.
pub const TEXT_CHAR_WIDTH: f64 = 8.0;

/// Approximate line height of label text, for hit boxes.
pub const TEXT_LINE_HEIGHT: f64 = 16.0;

/// Default canvas width for a new diagram.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;

/// Default canvas height for a new diagram.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;

/// Default node radius used by the factories.
pub const DEFAULT_NODE_RADIUS: f64 = 25.0;

/// Default node fill color.
pub const DEFAULT_NODE_COLOR: &str = "#ffffff";
