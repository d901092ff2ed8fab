//! Pointer-driven selection and drag state machine.
//!
//! Interprets pointer events into one of: single element drag, break-point
//! drag, pending-to-real transition drag, rectangle selection, or group
//! drag. Movement thresholds disambiguate click from drag, and every
//! per-gesture field is cleared unconditionally at pointer-up so the
//! machine can never get stuck mid-gesture.

use std::collections::HashSet;

use flowkit_core::constants::{
    CANVAS_MARGIN, DRAG_PROMOTION_THRESHOLD, HIT_TOLERANCE, MOVE_LOG_THRESHOLD,
};
use flowkit_core::event_bus::{DiagramEvent, EventBus, GestureEvent, MutationEvent, SelectionEvent};
use flowkit_core::{DiagramError, ElementKind, Result};

use crate::model::{Bounds, Point, Transition};
use crate::path::{distance_from_point, label_contains_point};
use crate::selection::{select_in_rect, ElementRef, GroupSnapshot, MultiSelection};
use crate::store::DiagramStore;

/// Modifier keys relevant to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// The multi-select key (shift) is held.
    pub multi_select: bool,
}

/// Host-tunable interaction thresholds. Defaults mirror
/// `flowkit_core::constants`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Per-axis displacement that promotes a pending transition press to a
    /// drag.
    pub drag_promotion_threshold: f64,
    /// Hit radius for transition bodies and break points.
    pub hit_tolerance: f64,
    /// Margin kept between dragged break points and the canvas edge.
    pub canvas_margin: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_promotion_threshold: DRAG_PROMOTION_THRESHOLD,
            hit_tolerance: HIT_TOLERANCE,
            canvas_margin: CANVAS_MARGIN,
        }
    }
}

/// Current gesture of the state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A node follows the pointer at a fixed offset.
    DraggingNode { id: u64, offset: (f64, f64) },
    /// A text label follows the pointer at a fixed offset.
    DraggingText { id: u64, offset: (f64, f64) },
    /// One break point follows the pointer, clamped to the canvas.
    DraggingBreakPoint { transition: u64, index: usize },
    /// A press landed on a transition body; click vs. drag is still
    /// ambiguous until the promotion threshold is crossed.
    PendingTransitionDrag {
        id: u64,
        origin: Point,
        initial_break_points: Vec<Point>,
    },
    /// All break points of a transition translate together from their
    /// recorded initial positions.
    DraggingTransition {
        id: u64,
        origin: Point,
        initial_break_points: Vec<Point>,
    },
    /// A selection rectangle is being dragged over empty space.
    RectSelecting { origin: Point, current: Point },
    /// Every multi-selected element translates from a single snapshot.
    GroupDragging { origin: Point, snapshot: GroupSnapshot },
}

/// What a pointer-down landed on, in hit-priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hit {
    Node(u64),
    Text(u64),
    BreakPoint { transition: u64, index: usize },
    Transition(u64),
}

impl Hit {
    /// The element this hit selects. A break point selects its owning
    /// transition.
    fn element_ref(self) -> ElementRef {
        match self {
            Hit::Node(id) => ElementRef::node(id),
            Hit::Text(id) => ElementRef::text(id),
            Hit::BreakPoint { transition, .. } => ElementRef::transition(transition),
            Hit::Transition(id) => ElementRef::transition(id),
        }
    }
}

/// The selection and drag state machine.
///
/// Owns the transient gesture state and the current single selection; the
/// multi-selection set lives beside it in the diagram and is passed in, the
/// same way the store is.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: DragState,
    selection: Option<ElementRef>,
    /// Source node of an in-progress connection-drawing gesture.
    connect_from: Option<u64>,
    /// Pointer-down point of the current gesture, for the cosmetic
    /// did-it-move log at release.
    press: Option<Point>,
    config: InteractionConfig,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The current gesture.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The current single selection.
    pub fn selection(&self) -> Option<ElementRef> {
        self.selection
    }

    /// Source node of the in-progress connection gesture, if any.
    pub fn pending_connection(&self) -> Option<u64> {
        self.connect_from
    }

    /// Clears the single selection (used when the selected element is
    /// deleted out from under the machine).
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Arms connection drawing from a node. The next pointer-down on a
    /// target node completes it; escape or empty space aborts.
    pub fn begin_connection(
        &mut self,
        store: &DiagramStore,
        bus: &EventBus,
        from: u64,
    ) -> Result<()> {
        if store.get_node(from).is_none() {
            return Err(DiagramError::UnknownNode { id: from });
        }
        self.connect_from = Some(from);
        bus.publish(DiagramEvent::Gesture(GestureEvent::ConnectionStarted {
            from,
        }));
        Ok(())
    }

    /// Handles a pointer press, dispatching in priority order: connection
    /// completion, modifier toggle, group drag, element drag, break-point
    /// drag, pending transition drag, rectangle selection.
    pub fn pointer_down(
        &mut self,
        store: &mut DiagramStore,
        multi: &mut MultiSelection,
        bus: &EventBus,
        p: Point,
        modifiers: Modifiers,
    ) {
        self.press = Some(p);

        if let Some(from) = self.connect_from.take() {
            self.finish_connection(store, bus, from, p);
            return;
        }

        let hit = hit_test(store, p, &self.config);

        if modifiers.multi_select {
            if let Some(hit) = hit {
                // Starting multi-selection clears the single selection.
                self.selection = None;
                multi.toggle(hit.element_ref());
                bus.publish(DiagramEvent::Selection(SelectionEvent::MultiChanged {
                    count: multi.len(),
                }));
            }
            // No drag starts under the modifier.
            return;
        }

        if let Some(hit) = hit {
            if multi.contains(hit.element_ref()) {
                let snapshot = GroupSnapshot::capture(store, multi);
                tracing::debug!(elements = snapshot.len(), "group drag started");
                self.state = DragState::GroupDragging {
                    origin: p,
                    snapshot,
                };
                return;
            }
        }

        match hit {
            Some(Hit::Node(id)) => {
                self.clear_multi(multi, bus);
                if let Some(node) = store.get_node(id) {
                    let offset = (p.x - node.position.x, p.y - node.position.y);
                    self.state = DragState::DraggingNode { id, offset };
                }
                self.set_single(bus, ElementRef::node(id));
            }
            Some(Hit::Text(id)) => {
                self.clear_multi(multi, bus);
                if let Some(text) = store.get_text(id) {
                    let offset = (p.x - text.position.x, p.y - text.position.y);
                    self.state = DragState::DraggingText { id, offset };
                }
                self.set_single(bus, ElementRef::text(id));
            }
            Some(Hit::BreakPoint { transition, index }) => {
                self.clear_multi(multi, bus);
                self.state = DragState::DraggingBreakPoint { transition, index };
                self.set_single(bus, ElementRef::transition(transition));
            }
            Some(Hit::Transition(id)) => {
                // Click vs. drag is ambiguous on a transition body; defer
                // the decision to the promotion threshold.
                let initial_break_points = store
                    .get_transition(id)
                    .map(|t| t.break_points.clone())
                    .unwrap_or_default();
                self.state = DragState::PendingTransitionDrag {
                    id,
                    origin: p,
                    initial_break_points,
                };
            }
            None => {
                if self.selection.take().is_some() {
                    // Also hides any open inline editor on the host side.
                    bus.publish(DiagramEvent::Selection(SelectionEvent::Cleared));
                }
                self.state = DragState::RectSelecting {
                    origin: p,
                    current: p,
                };
            }
        }
    }

    /// Handles pointer movement for the active gesture.
    pub fn pointer_move(&mut self, store: &mut DiagramStore, canvas: Bounds, p: Point) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            DragState::Idle => DragState::Idle,
            DragState::DraggingNode { id, offset } => {
                if let Some(node) = store.get_node(id) {
                    let dx = p.x - offset.0 - node.position.x;
                    let dy = p.y - offset.1 - node.position.y;
                    translate_node(store, id, dx, dy);
                }
                DragState::DraggingNode { id, offset }
            }
            DragState::DraggingText { id, offset } => {
                if let Some(text) = store.get_text_mut(id) {
                    text.position = Point::new(p.x - offset.0, p.y - offset.1);
                }
                DragState::DraggingText { id, offset }
            }
            DragState::DraggingBreakPoint { transition, index } => {
                let clamped = clamp_to_canvas(p, canvas, self.config.canvas_margin);
                if let Some(t) = store.get_transition_mut(transition) {
                    if let Some(bp) = t.break_points.get_mut(index) {
                        *bp = clamped;
                    }
                }
                DragState::DraggingBreakPoint { transition, index }
            }
            DragState::PendingTransitionDrag {
                id,
                origin,
                initial_break_points,
            } => {
                let threshold = self.config.drag_promotion_threshold;
                if (p.x - origin.x).abs() > threshold || (p.y - origin.y).abs() > threshold {
                    tracing::debug!(transition = id, "pending press promoted to transition drag");
                    apply_transition_delta(store, id, &initial_break_points, p.x - origin.x, p.y - origin.y);
                    DragState::DraggingTransition {
                        id,
                        origin,
                        initial_break_points,
                    }
                } else {
                    DragState::PendingTransitionDrag {
                        id,
                        origin,
                        initial_break_points,
                    }
                }
            }
            DragState::DraggingTransition {
                id,
                origin,
                initial_break_points,
            } => {
                apply_transition_delta(store, id, &initial_break_points, p.x - origin.x, p.y - origin.y);
                DragState::DraggingTransition {
                    id,
                    origin,
                    initial_break_points,
                }
            }
            DragState::RectSelecting { origin, .. } => DragState::RectSelecting {
                origin,
                current: p,
            },
            DragState::GroupDragging { origin, snapshot } => {
                // Always snapshot + cumulative delta; per-frame deltas
                // would accumulate rounding drift.
                snapshot.apply(store, p.x - origin.x, p.y - origin.y);
                DragState::GroupDragging { origin, snapshot }
            }
        };
    }

    /// Handles pointer release: finishes the gesture, emits its
    /// notification, and unconditionally clears all transient state.
    pub fn pointer_up(
        &mut self,
        store: &mut DiagramStore,
        multi: &mut MultiSelection,
        bus: &EventBus,
        p: Point,
    ) {
        let state = std::mem::take(&mut self.state);
        let press = self.press.take();

        match state {
            DragState::Idle => {}
            DragState::DraggingNode { id, .. } => {
                let (dx, dy) = self.log_movement("node", id, press, p);
                if dx != 0.0 || dy != 0.0 {
                    bus.publish(DiagramEvent::Mutation(MutationEvent::ElementMoved {
                        kind: ElementKind::Node,
                        id,
                        dx,
                        dy,
                    }));
                }
            }
            DragState::DraggingText { id, .. } => {
                let (dx, dy) = self.log_movement("text", id, press, p);
                if dx != 0.0 || dy != 0.0 {
                    bus.publish(DiagramEvent::Mutation(MutationEvent::ElementMoved {
                        kind: ElementKind::Text,
                        id,
                        dx,
                        dy,
                    }));
                }
            }
            DragState::DraggingBreakPoint { transition, .. } => {
                let moved = press.map_or(false, |start| p.x != start.x || p.y != start.y);
                if moved {
                    bus.publish(DiagramEvent::Mutation(MutationEvent::BreakPointsMoved {
                        transition,
                    }));
                }
            }
            DragState::PendingTransitionDrag { id, .. } => {
                // Threshold never crossed: a plain selection click.
                self.clear_multi(multi, bus);
                self.set_single(bus, ElementRef::transition(id));
            }
            DragState::DraggingTransition { id, .. } => {
                bus.publish(DiagramEvent::Mutation(MutationEvent::BreakPointsMoved {
                    transition: id,
                }));
            }
            DragState::RectSelecting { origin, .. } => {
                let rect = Bounds::from_corners(origin, p);
                select_in_rect(store, multi, rect);
                bus.publish(DiagramEvent::Selection(SelectionEvent::MultiChanged {
                    count: multi.len(),
                }));
            }
            DragState::GroupDragging { origin, snapshot } => {
                bus.publish(DiagramEvent::Gesture(GestureEvent::GroupMoved {
                    count: snapshot.len(),
                    dx: p.x - origin.x,
                    dy: p.y - origin.y,
                }));
            }
        }
    }

    /// Escape aborts in-progress connection drawing, else clears the
    /// multi-selection. Ordinary state transitions, not async cancellation.
    pub fn escape(&mut self, multi: &mut MultiSelection, bus: &EventBus) {
        if self.connect_from.take().is_some() {
            bus.publish(DiagramEvent::Gesture(GestureEvent::ConnectionCancelled));
        } else if !multi.is_empty() {
            multi.clear();
            bus.publish(DiagramEvent::Selection(SelectionEvent::MultiChanged {
                count: 0,
            }));
        }
    }

    fn finish_connection(&mut self, store: &mut DiagramStore, bus: &EventBus, from: u64, p: Point) {
        let target = store.node_at(p).map(|n| n.id);
        match target {
            Some(to) if to != from => {
                let id = store.generate_id();
                match store.insert_transition(Transition::new(id, from, to)) {
                    Ok(()) => {
                        bus.publish(DiagramEvent::Mutation(MutationEvent::ElementCreated {
                            kind: ElementKind::Transition,
                            id,
                        }));
                        bus.publish(DiagramEvent::Gesture(GestureEvent::ConnectionCompleted {
                            transition: id,
                        }));
                    }
                    Err(err) => {
                        tracing::warn!(from, to, %err, "connection rejected");
                        bus.publish(DiagramEvent::Gesture(GestureEvent::ConnectionCancelled));
                    }
                }
            }
            _ => {
                bus.publish(DiagramEvent::Gesture(GestureEvent::ConnectionCancelled));
            }
        }
    }

    fn set_single(&mut self, bus: &EventBus, element: ElementRef) {
        self.selection = Some(element);
        bus.publish(DiagramEvent::Selection(SelectionEvent::SingleSelected {
            kind: element.kind,
            id: element.id,
        }));
    }

    fn clear_multi(&mut self, multi: &mut MultiSelection, bus: &EventBus) {
        if !multi.is_empty() {
            multi.clear();
            bus.publish(DiagramEvent::Selection(SelectionEvent::MultiChanged {
                count: 0,
            }));
        }
    }

    /// Cosmetic did-it-actually-move log. Returns the gesture's total
    /// pointer displacement.
    fn log_movement(&self, kind: &str, id: u64, press: Option<Point>, p: Point) -> (f64, f64) {
        let Some(press) = press else {
            return (0.0, 0.0);
        };
        let dx = p.x - press.x;
        let dy = p.y - press.y;
        if dx.abs() > MOVE_LOG_THRESHOLD || dy.abs() > MOVE_LOG_THRESHOLD {
            tracing::debug!(kind, id, dx, dy, "element moved");
        } else {
            tracing::debug!(kind, id, "press released without significant movement");
        }
        (dx, dy)
    }
}

/// Hit test in priority order: nodes, texts, break points, transition
/// bodies (including label areas). Topmost (most recently added) wins
/// within each class.
fn hit_test(store: &DiagramStore, p: Point, config: &InteractionConfig) -> Option<Hit> {
    if let Some(node) = store.node_at(p) {
        return Some(Hit::Node(node.id));
    }
    if let Some(text) = store.text_at(p) {
        return Some(Hit::Text(text.id));
    }
    if let Some((transition, index)) = break_point_at(store, p, config.hit_tolerance) {
        return Some(Hit::BreakPoint { transition, index });
    }
    if let Some(id) = transition_at(store, p, config.hit_tolerance) {
        return Some(Hit::Transition(id));
    }
    None
}

/// Nearest break point within `radius` of the pointer.
fn break_point_at(store: &DiagramStore, p: Point, radius: f64) -> Option<(u64, usize)> {
    let mut best: Option<(u64, usize, f64)> = None;
    for transition in store.transitions() {
        for (index, bp) in transition.break_points.iter().enumerate() {
            let d = bp.distance_to(&p);
            if d < radius && best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((transition.id, index, d));
            }
        }
    }
    best.map(|(id, index, _)| (id, index))
}

/// Topmost transition whose path or label area the pointer hits.
fn transition_at(store: &DiagramStore, p: Point, tolerance: f64) -> Option<u64> {
    let ids: Vec<u64> = store.transitions().map(|t| t.id).collect();
    for id in ids.into_iter().rev() {
        let Some(t) = store.get_transition(id) else {
            continue;
        };
        if distance_from_point(store, t, p.x, p.y) <= tolerance
            || label_contains_point(store, t, p.x, p.y)
        {
            return Some(id);
        }
    }
    None
}

fn clamp_to_canvas(p: Point, canvas: Bounds, margin: f64) -> Point {
    let inner = canvas.expanded(-margin);
    Point::new(
        p.x.clamp(inner.min_x, inner.max_x),
        p.y.clamp(inner.min_y, inner.max_y),
    )
}

/// Translates all break points of a dragged transition from their recorded
/// initial positions by the cumulative pointer delta.
fn apply_transition_delta(
    store: &mut DiagramStore,
    transition_id: u64,
    initial: &[Point],
    dx: f64,
    dy: f64,
) {
    if let Some(t) = store.get_transition_mut(transition_id) {
        for (bp, origin) in t.break_points.iter_mut().zip(initial) {
            *bp = origin.translated(dx, dy);
        }
    }
}

/// Moves a node rigidly: break points of every touching transition follow
/// by the same delta, and the branch targets of a decision node follow
/// their decision.
pub(crate) fn translate_node(store: &mut DiagramStore, node_id: u64, dx: f64, dy: f64) {
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    let mut moved_nodes = vec![node_id];
    if store
        .get_node(node_id)
        .is_some_and(|n| n.shape.is_decision())
    {
        if let Some((first, second)) = store.branch_transitions_of(node_id) {
            for tid in [first, second] {
                if let Some(target) = store.get_transition(tid).map(|t| t.to) {
                    if target != node_id && !moved_nodes.contains(&target) {
                        moved_nodes.push(target);
                    }
                }
            }
        }
    }

    let mut translated: HashSet<u64> = HashSet::new();
    for &id in &moved_nodes {
        if let Some(node) = store.get_node_mut(id) {
            node.position.x += dx;
            node.position.y += dy;
        }
        for tid in store.transitions_touching(id) {
            // A transition between two moved nodes translates exactly once.
            if translated.insert(tid) {
                if let Some(t) = store.get_transition_mut(tid) {
                    t.translate_break_points(dx, dy);
                }
            }
        }
    }
}
