//! Connection routing: where a transition visually starts, ends, and bends.
//!
//! Ordinary transitions run between the two node boundaries along the line
//! of sight. Decision-branch transitions leave a fixed anchor corner and
//! follow an orthogonal three-segment "robot arm" instead of a straight
//! line.

use flowkit_core::constants::{BRANCH_ARM_LENGTH, BRANCH_TARGET_DISTANCE};
use flowkit_core::{DiagramError, Result};

use crate::model::{AnchorCorner, Node, Orientation, Point, Transition};
use crate::store::DiagramStore;

/// Visual start and end of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConnectionPoints {
    pub start: Point,
    pub end: Point,
}

impl ConnectionPoints {
    /// True for the all-zero fallback produced on invalid geometry input.
    pub fn is_degenerate(&self) -> bool {
        self.start.x == 0.0 && self.start.y == 0.0 && self.end.x == 0.0 && self.end.y == 0.0
    }
}

/// Computes the visual start/end points of a transition.
///
/// The end point is computed first: its boundary offset needs the angle out
/// of the start, and a fixed-corner start is known before the end is. The
/// start is then either the anchored corner or the `from` boundary toward
/// the finished end point.
///
/// Missing endpoint nodes or non-finite coordinates yield the all-zero
/// degenerate result (and a log line) rather than an error, so rendering
/// never fails on a transiently inconsistent transition.
pub fn connection_points(store: &DiagramStore, transition: &Transition) -> ConnectionPoints {
    let (Some(from), Some(to)) = (
        store.get_node(transition.from),
        store.get_node(transition.to),
    ) else {
        tracing::warn!(
            transition = transition.id,
            from = transition.from,
            to = transition.to,
            "transition endpoint missing; returning degenerate connection points"
        );
        return ConnectionPoints::default();
    };
    if !from.position.is_finite() || !to.position.is_finite() {
        tracing::warn!(
            transition = transition.id,
            "transition endpoint has non-finite coordinates; returning degenerate connection points"
        );
        return ConnectionPoints::default();
    }

    let anchored = anchored_start(from, transition);
    let start_hint = anchored.unwrap_or(from.position);

    // End point: back off from the target center along the incoming angle.
    let angle_in = (to.position.y - start_hint.y).atan2(to.position.x - start_hint.x);
    let end_dist = to.boundary_distance(angle_in);
    let end = Point::new(
        to.position.x - angle_in.cos() * end_dist,
        to.position.y - angle_in.sin() * end_dist,
    );

    let start = match anchored {
        Some(corner) => corner,
        None => {
            let angle_out = (end.y - from.position.y).atan2(end.x - from.position.x);
            let start_dist = from.boundary_distance(angle_out);
            Point::new(
                from.position.x + angle_out.cos() * start_dist,
                from.position.y + angle_out.sin() * start_dist,
            )
        }
    };

    ConnectionPoints { start, end }
}

/// The fixed-corner start point, when the transition is anchored to one.
/// Only decision nodes honor their anchor corner.
fn anchored_start(from: &Node, transition: &Transition) -> Option<Point> {
    transition
        .from_corner
        .filter(|_| from.shape.is_decision())
        .map(|corner| from.corner_point(corner))
}

/// Builds the orthogonal "robot arm" polyline of a decision-branch
/// transition: out of the corner by the fixed arm length, across to align
/// with the target on the complementary axis, then straight into the target
/// boundary.
///
/// Falls back to an empty path (with a log line) when either endpoint is
/// missing, mirroring [`connection_points`].
pub fn branch_path(store: &DiagramStore, transition: &Transition) -> Vec<Point> {
    let (Some(from), Some(to)) = (
        store.get_node(transition.from),
        store.get_node(transition.to),
    ) else {
        tracing::warn!(
            transition = transition.id,
            "branch endpoint missing; returning empty arm path"
        );
        return Vec::new();
    };
    let Some(corner) = transition.from_corner else {
        // A branch without a corner is repaired at rotation time; route it
        // as a plain line until then.
        let cp = connection_points(store, transition);
        return vec![cp.start, cp.end];
    };

    let p0 = from.corner_point(corner);
    let (ox, oy) = corner.outward();
    let p1 = Point::new(p0.x + ox * BRANCH_ARM_LENGTH, p0.y + oy * BRANCH_ARM_LENGTH);

    // Across to the target's axis, then in.
    let p2 = if corner.is_vertical() {
        Point::new(to.position.x, p1.y)
    } else {
        Point::new(p1.x, to.position.y)
    };
    let angle_in = (to.position.y - p2.y).atan2(to.position.x - p2.x);
    let end_dist = to.boundary_distance(angle_in);
    let end = Point::new(
        to.position.x - angle_in.cos() * end_dist,
        to.position.y - angle_in.sin() * end_dist,
    );

    vec![p0, p1, p2, end]
}

/// Rotates a decision node 90 degrees clockwise.
///
/// Re-derives both branch corners from the orientation lookup table and
/// repositions both branch target nodes at the fixed radial distance from
/// the decision center, along the new corner axes. Node and transition
/// identities are untouched; only fields mutate.
pub fn rotate_decision_node(store: &mut DiagramStore, node_id: u64) -> Result<Orientation> {
    let node = store
        .get_node(node_id)
        .ok_or(DiagramError::UnknownNode { id: node_id })?;
    if !node.shape.is_decision() {
        return Err(DiagramError::NotADecisionNode { id: node_id });
    }
    let center = node.position;
    let orientation = node.orientation.rotated();

    if let Some(node) = store.get_node_mut(node_id) {
        node.orientation = orientation;
    }

    let (first_corner, second_corner) = orientation.branch_corners();
    if let Some((first, second)) = store.branch_transitions_of(node_id) {
        reanchor_branch(store, first, first_corner, center);
        reanchor_branch(store, second, second_corner, center);
    }

    tracing::debug!(
        node = node_id,
        degrees = orientation.degrees(),
        "decision node rotated"
    );
    Ok(orientation)
}

fn reanchor_branch(
    store: &mut DiagramStore,
    transition_id: u64,
    corner: AnchorCorner,
    center: Point,
) {
    let Some(target_id) = store.get_transition(transition_id).map(|t| t.to) else {
        return;
    };
    if let Some(t) = store.get_transition_mut(transition_id) {
        t.from_corner = Some(corner);
    }
    let (ox, oy) = corner.outward();
    if let Some(target) = store.get_node_mut(target_id) {
        target.position = Point::new(
            center.x + ox * BRANCH_TARGET_DISTANCE,
            center.y + oy * BRANCH_TARGET_DISTANCE,
        );
    }
}
