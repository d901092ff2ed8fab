//! Break-point path model.
//!
//! A transition's visual path is `[start, break points.., end]`. Break
//! points are inserted at the segment nearest the click (never appended),
//! removed by nearest-point lookup under a fixed radius, and the whole path
//! doubles as the transition's hit area.

use flowkit_core::constants::{
    BREAK_POINT_REMOVE_RADIUS, TEXT_CHAR_WIDTH, TEXT_LINE_HEIGHT,
};
use flowkit_core::{DiagramError, Result};

use crate::arrows;
use crate::model::{distance_to_segment, Bounds, Point, Transition};
use crate::routing::{branch_path, connection_points};
use crate::store::DiagramStore;

/// The full polyline of a transition: connection start, break points in
/// path order, connection end. Branch transitions yield their robot-arm
/// polyline instead (they never carry break points).
pub fn path_points(store: &DiagramStore, transition: &Transition) -> Vec<Point> {
    if transition.is_branch() {
        return branch_path(store, transition);
    }
    let cp = connection_points(store, transition);
    let mut points = Vec::with_capacity(transition.break_points.len() + 2);
    points.push(cp.start);
    points.extend(transition.break_points.iter().copied());
    points.push(cp.end);
    points
}

/// Index of the path segment nearest to `p` (0 = the segment leaving the
/// start point). Returns 0 for degenerate paths.
pub fn nearest_segment_index(points: &[Point], p: Point) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, pair) in points.windows(2).enumerate() {
        let d = distance_to_segment(p, pair[0], pair[1]);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Inserts a break point at the path segment nearest to (x, y), so the new
/// point lands where the user clicked rather than at the end of the
/// sequence. Returns the insertion index within the break-point list.
///
/// Rejected for decision-branch transitions, which keep their fixed arm.
pub fn add_break_point(store: &mut DiagramStore, transition_id: u64, x: f64, y: f64) -> Result<usize> {
    let transition = store
        .get_transition(transition_id)
        .ok_or(DiagramError::UnknownTransition { id: transition_id })?;
    if transition.is_branch() {
        return Err(DiagramError::ProtectedTransition {
            id: transition_id,
            action: "given break points",
        });
    }
    let p = Point::new(x, y);
    let points = path_points(store, transition);
    // Segment i runs from path index i to i+1; inserting at break-point
    // index i splits exactly that segment.
    let index = nearest_segment_index(&points, p);

    let transition = store
        .get_transition_mut(transition_id)
        .ok_or(DiagramError::UnknownTransition { id: transition_id })?;
    let index = index.min(transition.break_points.len());
    transition.break_points.insert(index, p);
    Ok(index)
}

/// Removes the break point nearest to (x, y) when it lies within the
/// removal radius; otherwise the call is a no-op. Returns whether a point
/// was removed.
pub fn remove_break_point(
    store: &mut DiagramStore,
    transition_id: u64,
    x: f64,
    y: f64,
) -> Result<bool> {
    let transition = store
        .get_transition_mut(transition_id)
        .ok_or(DiagramError::UnknownTransition { id: transition_id })?;
    let p = Point::new(x, y);
    let mut nearest: Option<(usize, f64)> = None;
    for (i, bp) in transition.break_points.iter().enumerate() {
        let d = bp.distance_to(&p);
        if nearest.map_or(true, |(_, best)| d < best) {
            nearest = Some((i, d));
        }
    }
    match nearest {
        Some((index, dist)) if dist < BREAK_POINT_REMOVE_RADIUS => {
            transition.break_points.remove(index);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Minimum distance from (x, y) to the transition's path, over every
/// consecutive pair of path points. This is the transition hit test.
pub fn distance_from_point(store: &DiagramStore, transition: &Transition, x: f64, y: f64) -> f64 {
    let p = Point::new(x, y);
    let points = path_points(store, transition);
    points
        .windows(2)
        .map(|pair| distance_to_segment(p, pair[0], pair[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Rectangular hit test around the transition label, which sits at the
/// midpoint of the path. Empty labels have no hit area.
pub fn label_contains_point(
    store: &DiagramStore,
    transition: &Transition,
    x: f64,
    y: f64,
) -> bool {
    if transition.label.is_empty() {
        return false;
    }
    let points = path_points(store, transition);
    let Some(mid) = arrows::position_at_fraction(&points, 0.5) else {
        return false;
    };
    let width = (transition.label.chars().count() as f64 * TEXT_CHAR_WIDTH).max(TEXT_CHAR_WIDTH);
    Bounds::centered(mid.position, width, TEXT_LINE_HEIGHT).contains_point(Point::new(x, y))
}
