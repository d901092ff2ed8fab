use serde::{Deserialize, Serialize};

use flowkit_core::constants::{
    DATA_MODEL_HEADER_HEIGHT, DATA_MODEL_ROW_HEIGHT, DATA_MODEL_WIDTH_FACTOR, DEFAULT_NODE_COLOR,
    TERMINAL_SEMI_AXIS_X, TERMINAL_SEMI_AXIS_Y,
};

use super::transition::AnchorCorner;
use super::{Bounds, Point};

/// Orientation of a decision node, in 90-degree steps.
///
/// Orientation is meaningful only for decision nodes; it selects which two
/// corners the branch transitions leave from. It never affects hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub fn degrees(self) -> u16 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Parses degrees; anything other than 0/90/180/270 is rejected.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Orientation::Deg0),
            90 => Some(Orientation::Deg90),
            180 => Some(Orientation::Deg180),
            270 => Some(Orientation::Deg270),
            _ => None,
        }
    }

    /// The next orientation in a 90-degree rotation cycle.
    pub fn rotated(self) -> Self {
        match self {
            Orientation::Deg0 => Orientation::Deg90,
            Orientation::Deg90 => Orientation::Deg180,
            Orientation::Deg180 => Orientation::Deg270,
            Orientation::Deg270 => Orientation::Deg0,
        }
    }

    /// Corners the (first, second) branch transitions leave from at this
    /// orientation. Fixed 4-entry table; the branch arms rotate through the
    /// same "letter-C" layouts as the orientation cycles.
    pub fn branch_corners(self) -> (AnchorCorner, AnchorCorner) {
        match self {
            Orientation::Deg0 => (AnchorCorner::Left, AnchorCorner::Right),
            Orientation::Deg90 => (AnchorCorner::Top, AnchorCorner::Bottom),
            Orientation::Deg180 => (AnchorCorner::Right, AnchorCorner::Left),
            Orientation::Deg270 => (AnchorCorner::Bottom, AnchorCorner::Top),
        }
    }
}

/// Shape kind of a node, carrying only the geometry parameters that kind
/// needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeShape {
    /// Circular process step.
    Plain,
    /// Elliptic start terminal.
    TerminalStart,
    /// Elliptic stop terminal.
    TerminalStop,
    /// Diamond with two outgoing branch transitions.
    Decision,
    /// Rectangular table whose height grows with its field count.
    DataModel {
        /// Field names shown in the table body. The field editor itself is
        /// an external collaborator; the core only needs the count for
        /// geometry.
        fields: Vec<String>,
    },
}

impl NodeShape {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeShape::TerminalStart | NodeShape::TerminalStop)
    }

    pub fn is_decision(&self) -> bool {
        matches!(self, NodeShape::Decision)
    }

    /// Stable name used in serialized records.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeShape::Plain => "plain",
            NodeShape::TerminalStart => "terminal-start",
            NodeShape::TerminalStop => "terminal-stop",
            NodeShape::Decision => "decision",
            NodeShape::DataModel { .. } => "data-model",
        }
    }

    /// Parses a record type name. Data-model nodes start with no fields;
    /// the loader attaches them afterwards.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "plain" => Some(NodeShape::Plain),
            "terminal-start" => Some(NodeShape::TerminalStart),
            "terminal-stop" => Some(NodeShape::TerminalStop),
            "decision" => Some(NodeShape::Decision),
            "data-model" => Some(NodeShape::DataModel { fields: Vec::new() }),
            _ => None,
        }
    }
}

/// A shaped node on the diagram surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    pub position: Point,
    pub radius: f64,
    pub label: String,
    pub color: String,
    pub shape: NodeShape,
    pub orientation: Orientation,
}

impl Node {
    pub fn new(id: u64, shape: NodeShape, position: Point, radius: f64) -> Self {
        Self {
            id,
            position,
            radius,
            label: String::new(),
            color: DEFAULT_NODE_COLOR.to_string(),
            shape,
            orientation: Orientation::default(),
        }
    }

    /// Shape-aware containment test.
    ///
    /// Decision-node orientation deliberately plays no role here: it only
    /// selects branch corners.
    pub fn contains_point(&self, p: Point) -> bool {
        let dx = p.x - self.position.x;
        let dy = p.y - self.position.y;
        match &self.shape {
            NodeShape::Plain => (dx * dx + dy * dy).sqrt() < self.radius,
            NodeShape::TerminalStart | NodeShape::TerminalStop => {
                let a = self.radius * TERMINAL_SEMI_AXIS_X;
                let b = self.radius * TERMINAL_SEMI_AXIS_Y;
                (dx / a) * (dx / a) + (dy / b) * (dy / b) <= 1.0
            }
            NodeShape::Decision => dx.abs() / self.radius + dy.abs() / self.radius <= 1.0,
            NodeShape::DataModel { fields } => {
                let (half_w, half_h) = Self::data_model_half_extent(self.radius, fields.len());
                dx.abs() <= half_w && dy.abs() <= half_h
            }
        }
    }

    /// Distance from the node center to its boundary along `angle` (radians).
    ///
    /// Terminals use the elliptic radial formula; every other shape is
    /// treated as a circle of the node radius for routing purposes.
    pub fn boundary_distance(&self, angle: f64) -> f64 {
        if self.shape.is_terminal() {
            let a = self.radius * TERMINAL_SEMI_AXIS_X;
            let b = self.radius * TERMINAL_SEMI_AXIS_Y;
            let (s, c) = angle.sin_cos();
            (a * b) / ((b * c) * (b * c) + (a * s) * (a * s)).sqrt()
        } else {
            self.radius
        }
    }

    /// Axis-aligned bounding box of the node's rendered shape.
    pub fn bounds(&self) -> Bounds {
        match &self.shape {
            NodeShape::Plain | NodeShape::Decision => Bounds::centered(
                self.position,
                self.radius * 2.0,
                self.radius * 2.0,
            ),
            NodeShape::TerminalStart | NodeShape::TerminalStop => Bounds::centered(
                self.position,
                self.radius * TERMINAL_SEMI_AXIS_X * 2.0,
                self.radius * TERMINAL_SEMI_AXIS_Y * 2.0,
            ),
            NodeShape::DataModel { fields } => {
                let (half_w, half_h) = Self::data_model_half_extent(self.radius, fields.len());
                Bounds::centered(self.position, half_w * 2.0, half_h * 2.0)
            }
        }
    }

    /// The anchor-corner point at radius distance along the corner's axis.
    pub fn corner_point(&self, corner: AnchorCorner) -> Point {
        let (ox, oy) = corner.outward();
        Point::new(
            self.position.x + ox * self.radius,
            self.position.y + oy * self.radius,
        )
    }

    fn data_model_half_extent(radius: f64, field_count: usize) -> (f64, f64) {
        let width = radius * DATA_MODEL_WIDTH_FACTOR;
        let height = (radius * 2.0)
            .max(field_count as f64 * DATA_MODEL_ROW_HEIGHT + DATA_MODEL_HEADER_HEIGHT);
        (width / 2.0, height / 2.0)
    }
}
