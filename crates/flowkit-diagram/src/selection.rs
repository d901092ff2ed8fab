//! Multi-selection engine: rectangle-based bulk selection, toggle
//! membership, and the snapshot map that keeps group drags drift-free.

use std::collections::{HashMap, HashSet};

use flowkit_core::ElementKind;

use crate::model::{Bounds, Point};
use crate::routing::connection_points;
use crate::store::DiagramStore;

/// Reference to one diagram element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: u64,
}

impl ElementRef {
    pub fn node(id: u64) -> Self {
        Self {
            kind: ElementKind::Node,
            id,
        }
    }

    pub fn text(id: u64) -> Self {
        Self {
            kind: ElementKind::Text,
            id,
        }
    }

    pub fn transition(id: u64) -> Self {
        Self {
            kind: ElementKind::Transition,
            id,
        }
    }
}

/// Set of multi-selected elements. No ordering is guaranteed.
#[derive(Debug, Clone, Default)]
pub struct MultiSelection {
    elements: HashSet<ElementRef>,
}

impl MultiSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, element: ElementRef) -> bool {
        self.elements.contains(&element)
    }

    /// Toggle membership; returns `true` when the element is now selected.
    pub fn toggle(&mut self, element: ElementRef) -> bool {
        if self.elements.remove(&element) {
            false
        } else {
            self.elements.insert(element);
            true
        }
    }

    pub fn insert(&mut self, element: ElementRef) {
        self.elements.insert(element);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.elements.iter().copied()
    }

    /// Drops references to elements that no longer exist in the store
    /// (after a cascade delete, for example).
    pub fn prune(&mut self, store: &DiagramStore) {
        self.elements.retain(|el| match el.kind {
            ElementKind::Node => store.get_node(el.id).is_some(),
            ElementKind::Text => store.get_text(el.id).is_some(),
            ElementKind::Transition => store.get_transition(el.id).is_some(),
        });
    }
}

/// Computes rectangle-selection membership: nodes and texts by bounding-box
/// overlap (not containment), transitions when either connection point
/// falls inside the rectangle. Replaces the selection's contents.
pub fn select_in_rect(store: &DiagramStore, selection: &mut MultiSelection, rect: Bounds) {
    selection.clear();
    for node in store.nodes() {
        if node.bounds().intersects(&rect) {
            selection.insert(ElementRef::node(node.id));
        }
    }
    for text in store.texts() {
        if text.bounds().intersects(&rect) {
            selection.insert(ElementRef::text(text.id));
        }
    }
    for transition in store.transitions() {
        let cp = connection_points(store, transition);
        if rect.contains_point(cp.start) || rect.contains_point(cp.end) {
            selection.insert(ElementRef::transition(transition.id));
        }
    }
}

/// Initial-position snapshot backing a group drag.
///
/// Every move recomputes positions as snapshot + cumulative pointer delta;
/// per-frame deltas are never compounded, so rounding cannot drift. Break
/// points are captured once per transition, so a transition spanning two
/// selected nodes still translates exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSnapshot {
    nodes: HashMap<u64, Point>,
    texts: HashMap<u64, Point>,
    break_points: HashMap<u64, Vec<Point>>,
}

impl GroupSnapshot {
    /// Captures the positions of every selected element, the break points
    /// of every transition affected by the drag, and the branch targets of
    /// any selected decision node (they follow their decision).
    pub fn capture(store: &DiagramStore, selection: &MultiSelection) -> Self {
        let mut snapshot = Self::default();

        for el in selection.iter() {
            match el.kind {
                ElementKind::Node => {
                    if let Some(node) = store.get_node(el.id) {
                        snapshot.nodes.insert(node.id, node.position);
                        if node.shape.is_decision() {
                            snapshot.capture_branch_targets(store, node.id);
                        }
                        for tid in store.transitions_touching(node.id) {
                            snapshot.capture_break_points(store, tid);
                        }
                    }
                }
                ElementKind::Text => {
                    if let Some(text) = store.get_text(el.id) {
                        snapshot.texts.insert(text.id, text.position);
                    }
                }
                ElementKind::Transition => {
                    snapshot.capture_break_points(store, el.id);
                }
            }
        }
        snapshot
    }

    fn capture_branch_targets(&mut self, store: &DiagramStore, decision_id: u64) {
        if let Some((first, second)) = store.branch_transitions_of(decision_id) {
            for tid in [first, second] {
                if let Some(target) = store
                    .get_transition(tid)
                    .and_then(|t| store.get_node(t.to))
                {
                    self.nodes.entry(target.id).or_insert(target.position);
                }
            }
        }
    }

    fn capture_break_points(&mut self, store: &DiagramStore, transition_id: u64) {
        if let Some(t) = store.get_transition(transition_id) {
            self.break_points
                .entry(t.id)
                .or_insert_with(|| t.break_points.clone());
        }
    }

    /// Applies the cumulative delta to every captured element.
    pub fn apply(&self, store: &mut DiagramStore, dx: f64, dy: f64) {
        for (&id, &origin) in &self.nodes {
            if let Some(node) = store.get_node_mut(id) {
                node.position = origin.translated(dx, dy);
            }
        }
        for (&id, &origin) in &self.texts {
            if let Some(text) = store.get_text_mut(id) {
                text.position = origin.translated(dx, dy);
            }
        }
        for (&id, origins) in &self.break_points {
            if let Some(t) = store.get_transition_mut(id) {
                for (bp, origin) in t.break_points.iter_mut().zip(origins) {
                    *bp = origin.translated(dx, dy);
                }
            }
        }
    }

    /// Number of captured elements (transitions counted via their break
    /// points).
    pub fn len(&self) -> usize {
        self.nodes.len() + self.texts.len() + self.break_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.texts.is_empty() && self.break_points.is_empty()
    }
}
