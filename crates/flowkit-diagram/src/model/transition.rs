use serde::{Deserialize, Serialize};

use super::Point;

/// Rendering style of a transition's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    #[default]
    Straight,
    Curved,
}

impl TransitionStyle {
    pub fn toggled(self) -> Self {
        match self {
            TransitionStyle::Straight => TransitionStyle::Curved,
            TransitionStyle::Curved => TransitionStyle::Straight,
        }
    }

    /// Stable name used in serialized records.
    pub fn type_name(self) -> &'static str {
        match self {
            TransitionStyle::Straight => "straight",
            TransitionStyle::Curved => "curved",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "straight" => Some(TransitionStyle::Straight),
            "curved" => Some(TransitionStyle::Curved),
            _ => None,
        }
    }
}

/// Arrowhead configuration of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowMode {
    /// One arrowhead near the destination.
    #[default]
    Single,
    /// Arrowheads near both endpoints, the start one reversed.
    Both,
    /// No arrowheads.
    None,
}

/// One of the four fixed anchor corners of a decision node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorCorner {
    Top,
    Bottom,
    Left,
    Right,
}

impl AnchorCorner {
    /// Unit vector pointing out of the node through this corner
    /// (screen coordinates, y down).
    pub fn outward(self) -> (f64, f64) {
        match self {
            AnchorCorner::Top => (0.0, -1.0),
            AnchorCorner::Bottom => (0.0, 1.0),
            AnchorCorner::Left => (-1.0, 0.0),
            AnchorCorner::Right => (1.0, 0.0),
        }
    }

    /// True for top/bottom corners, whose arms leave vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, AnchorCorner::Top | AnchorCorner::Bottom)
    }

    /// Stable name used in serialized records.
    pub fn type_name(self) -> &'static str {
        match self {
            AnchorCorner::Top => "top",
            AnchorCorner::Bottom => "bottom",
            AnchorCorner::Left => "left",
            AnchorCorner::Right => "right",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(AnchorCorner::Top),
            "bottom" => Some(AnchorCorner::Bottom),
            "left" => Some(AnchorCorner::Left),
            "right" => Some(AnchorCorner::Right),
            _ => None,
        }
    }
}

/// Which of a decision node's two outgoing edges a branch transition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchSlot {
    First,
    Second,
}

/// Whether a transition is an ordinary edge or a protected decision branch.
///
/// Branch-ness is explicit rather than inferred from the label: branches are
/// created only by the decision-node factory and carry their slot so the
/// rotation table can re-derive both corners deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionKind {
    #[default]
    Plain,
    Branch(BranchSlot),
}

impl TransitionKind {
    pub fn is_branch(&self) -> bool {
        matches!(self, TransitionKind::Branch(_))
    }

    /// Stable name used in serialized records.
    pub fn type_name(&self) -> &'static str {
        match self {
            TransitionKind::Plain => "plain",
            TransitionKind::Branch(BranchSlot::First) => "branch-first",
            TransitionKind::Branch(BranchSlot::Second) => "branch-second",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "plain" => Some(TransitionKind::Plain),
            "branch-first" => Some(TransitionKind::Branch(BranchSlot::First)),
            "branch-second" => Some(TransitionKind::Branch(BranchSlot::Second)),
            _ => None,
        }
    }
}

/// A directed transition between two nodes.
///
/// Endpoints are stored as ids and resolved through the store at use time;
/// the transition never owns its nodes. Break points are ordered along the
/// path, not by creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: u64,
    pub from: u64,
    pub to: u64,
    pub label: String,
    pub kind: TransitionKind,
    pub style: TransitionStyle,
    pub arrow_mode: ArrowMode,
    /// Fixed start corner; set only when `from` is a decision node.
    pub from_corner: Option<AnchorCorner>,
    pub break_points: Vec<Point>,
}

impl Transition {
    pub fn new(id: u64, from: u64, to: u64) -> Self {
        Self {
            id,
            from,
            to,
            label: String::new(),
            kind: TransitionKind::Plain,
            style: TransitionStyle::default(),
            arrow_mode: ArrowMode::default(),
            from_corner: None,
            break_points: Vec::new(),
        }
    }

    /// Creates one of the two protected outgoing edges of a decision node.
    pub fn branch(
        id: u64,
        from: u64,
        to: u64,
        slot: BranchSlot,
        corner: AnchorCorner,
        label: &str,
    ) -> Self {
        Self {
            id,
            from,
            to,
            label: label.to_string(),
            kind: TransitionKind::Branch(slot),
            style: TransitionStyle::Straight,
            arrow_mode: ArrowMode::None,
            from_corner: Some(corner),
            break_points: Vec::new(),
        }
    }

    pub fn is_branch(&self) -> bool {
        self.kind.is_branch()
    }

    /// True when `node_id` is either endpoint.
    pub fn touches(&self, node_id: u64) -> bool {
        self.from == node_id || self.to == node_id
    }

    /// Rigidly translates every break point. Used when an endpoint node
    /// moves, preserving the path's shape relative to it.
    pub fn translate_break_points(&mut self, dx: f64, dy: f64) {
        for bp in &mut self.break_points {
            bp.x += dx;
            bp.y += dy;
        }
    }
}
