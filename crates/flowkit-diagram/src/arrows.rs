//! Arrow placement along transition paths.
//!
//! An arrowhead is positioned at a normalized fraction of the path's total
//! length, heading along the segment it lands in. Curved transitions reuse
//! the straight-segment parametrization: curvature is a rendering-only
//! offset, and re-deriving arc length would shift arrows on every existing
//! diagram.

use std::f64::consts::PI;

use flowkit_core::constants::{ARROW_HEAD_FRACTION, ARROW_TAIL_FRACTION};

use crate::model::{ArrowMode, Point, Transition};
use crate::path::path_points;
use crate::store::DiagramStore;

/// Position and heading of one arrowhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowPlacement {
    pub position: Point,
    /// Heading in radians, along the path direction at that point.
    pub angle: f64,
}

/// Walks the polyline to the point at fraction `t` of its total length.
///
/// Returns `None` for paths with fewer than two points or zero length.
/// `t` is clamped to [0, 1].
pub fn position_at_fraction(points: &[Point], t: f64) -> Option<ArrowPlacement> {
    if points.len() < 2 {
        return None;
    }
    let total: f64 = points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();
    if total == 0.0 {
        return None;
    }

    let target = t.clamp(0.0, 1.0) * total;
    let mut walked = 0.0;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg_len = a.distance_to(&b);
        if seg_len == 0.0 {
            continue;
        }
        if walked + seg_len >= target {
            let along = (target - walked) / seg_len;
            return Some(ArrowPlacement {
                position: Point::new(a.x + (b.x - a.x) * along, a.y + (b.y - a.y) * along),
                angle: (b.y - a.y).atan2(b.x - a.x),
            });
        }
        walked += seg_len;
    }

    // Rounding can leave the target a hair past the last segment.
    let a = points[points.len() - 2];
    let b = points[points.len() - 1];
    Some(ArrowPlacement {
        position: b,
        angle: (b.y - a.y).atan2(b.x - a.x),
    })
}

/// The arrowheads a transition renders.
///
/// Single-direction transitions carry one head near the destination;
/// bidirectional transitions add a reversed head near the source.
/// Decision-branch arms render no arrowheads at all.
pub fn arrowheads(store: &DiagramStore, transition: &Transition) -> Vec<ArrowPlacement> {
    if transition.is_branch() || transition.arrow_mode == ArrowMode::None {
        return Vec::new();
    }
    let points = path_points(store, transition);
    let mut heads = Vec::with_capacity(2);
    if transition.arrow_mode == ArrowMode::Both {
        if let Some(tail) = position_at_fraction(&points, ARROW_TAIL_FRACTION) {
            heads.push(ArrowPlacement {
                position: tail.position,
                angle: tail.angle + PI,
            });
        }
    }
    if let Some(head) = position_at_fraction(&points, ARROW_HEAD_FRACTION) {
        heads.push(head);
    }
    heads
}
