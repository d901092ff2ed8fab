//! Id-indexed element store for the diagram.
//!
//! `DiagramStore` owns every node, transition, and text label, plus the id
//! generator that stamps new elements. Transitions reference their endpoint
//! nodes by id and are resolved through the store at use time; removing a
//! node cascade-removes its incident transitions so no dangling reference
//! can survive.

use std::collections::HashMap;

use flowkit_core::{DiagramError, IdGenerator, Result};

use crate::model::{BranchSlot, Node, Point, TextLabel, Transition, TransitionKind};

/// Owning store for all diagram elements.
///
/// Iteration order is insertion order (oldest first); hit-testing walks it
/// in reverse so the most recently added element wins, matching draw order.
#[derive(Debug, Clone, Default)]
pub struct DiagramStore {
    nodes: HashMap<u64, Node>,
    transitions: HashMap<u64, Transition>,
    texts: HashMap<u64, TextLabel>,
    node_order: Vec<u64>,
    transition_order: Vec<u64>,
    text_order: Vec<u64>,
    ids: IdGenerator,
}

impl DiagramStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a new unique element id.
    pub fn generate_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    /// Ensures future ids are strictly greater than `id` (used after load).
    pub fn reseed_ids_above(&mut self, id: u64) {
        self.ids.reseed_above(id);
    }

    // --- nodes ---

    /// Inserts a node. The caller is responsible for stamping it with a
    /// fresh id from [`generate_id`](Self::generate_id) (or a loaded one).
    pub fn insert_node(&mut self, node: Node) {
        self.node_order.retain(|&id| id != node.id);
        self.node_order.push(node.id);
        self.nodes.insert(node.id, node);
    }

    pub fn get_node(&self, id: u64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_node_mut(&mut self, id: u64) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Removes a node and cascade-removes every transition touching it.
    ///
    /// Returns the node and the removed transitions. Branch transitions are
    /// not protected from the cascade: they die with either endpoint.
    pub fn remove_node(&mut self, id: u64) -> Result<(Node, Vec<Transition>)> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or(DiagramError::UnknownNode { id })?;
        self.node_order.retain(|&nid| nid != id);

        let incident: Vec<u64> = self
            .transition_order
            .iter()
            .copied()
            .filter(|tid| {
                self.transitions
                    .get(tid)
                    .is_some_and(|t| t.touches(id))
            })
            .collect();
        let mut removed = Vec::with_capacity(incident.len());
        for tid in incident {
            if let Some(t) = self.transitions.remove(&tid) {
                removed.push(t);
            }
            self.transition_order.retain(|&x| x != tid);
        }
        Ok((node, removed))
    }

    /// Nodes in insertion (draw) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Topmost node containing the point, if any.
    pub fn node_at(&self, p: Point) -> Option<&Node> {
        self.node_order
            .iter()
            .rev()
            .filter_map(|id| self.nodes.get(id))
            .find(|n| n.contains_point(p))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- transitions ---

    /// Inserts a transition after validating both endpoints exist and that
    /// no transition with the same ordered (from, to) pair is present.
    /// A rejected insert leaves the collection unchanged.
    pub fn insert_transition(&mut self, transition: Transition) -> Result<()> {
        if !self.nodes.contains_key(&transition.from) {
            return Err(DiagramError::UnknownNode {
                id: transition.from,
            });
        }
        if !self.nodes.contains_key(&transition.to) {
            return Err(DiagramError::UnknownNode { id: transition.to });
        }
        if self.has_transition_between(transition.from, transition.to) {
            return Err(DiagramError::DuplicateTransition {
                from: transition.from,
                to: transition.to,
            });
        }
        self.transition_order.push(transition.id);
        self.transitions.insert(transition.id, transition);
        Ok(())
    }

    pub fn get_transition(&self, id: u64) -> Option<&Transition> {
        self.transitions.get(&id)
    }

    pub fn get_transition_mut(&mut self, id: u64) -> Option<&mut Transition> {
        self.transitions.get_mut(&id)
    }

    /// Removes a transition without any protection check; command-level
    /// code guards decision branches before calling this.
    pub fn remove_transition(&mut self, id: u64) -> Result<Transition> {
        let t = self
            .transitions
            .remove(&id)
            .ok_or(DiagramError::UnknownTransition { id })?;
        self.transition_order.retain(|&tid| tid != id);
        Ok(t)
    }

    /// Transitions in insertion (draw) order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transition_order
            .iter()
            .filter_map(|id| self.transitions.get(id))
    }

    pub fn transitions_mut(&mut self) -> impl Iterator<Item = &mut Transition> {
        self.transitions.values_mut()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// True when a transition with this ordered (from, to) pair exists.
    pub fn has_transition_between(&self, from: u64, to: u64) -> bool {
        self.transitions
            .values()
            .any(|t| t.from == from && t.to == to)
    }

    /// Ids of all transitions with `node_id` as either endpoint.
    pub fn transitions_touching(&self, node_id: u64) -> Vec<u64> {
        self.transition_order
            .iter()
            .copied()
            .filter(|tid| {
                self.transitions
                    .get(tid)
                    .is_some_and(|t| t.touches(node_id))
            })
            .collect()
    }

    /// The (first, second) branch transition ids of a decision node, when
    /// both are present.
    pub fn branch_transitions_of(&self, node_id: u64) -> Option<(u64, u64)> {
        let mut first = None;
        let mut second = None;
        for t in self.transitions.values() {
            if t.from != node_id {
                continue;
            }
            match t.kind {
                TransitionKind::Branch(BranchSlot::First) => first = Some(t.id),
                TransitionKind::Branch(BranchSlot::Second) => second = Some(t.id),
                TransitionKind::Plain => {}
            }
        }
        first.zip(second)
    }

    // --- texts ---

    pub fn insert_text(&mut self, text: TextLabel) {
        self.text_order.retain(|&id| id != text.id);
        self.text_order.push(text.id);
        self.texts.insert(text.id, text);
    }

    pub fn get_text(&self, id: u64) -> Option<&TextLabel> {
        self.texts.get(&id)
    }

    pub fn get_text_mut(&mut self, id: u64) -> Option<&mut TextLabel> {
        self.texts.get_mut(&id)
    }

    pub fn remove_text(&mut self, id: u64) -> Result<TextLabel> {
        let t = self
            .texts
            .remove(&id)
            .ok_or(DiagramError::UnknownText { id })?;
        self.text_order.retain(|&tid| tid != id);
        Ok(t)
    }

    /// Texts in insertion (draw) order.
    pub fn texts(&self) -> impl Iterator<Item = &TextLabel> {
        self.text_order.iter().filter_map(|id| self.texts.get(id))
    }

    /// Topmost text label containing the point, if any.
    pub fn text_at(&self, p: Point) -> Option<&TextLabel> {
        self.text_order
            .iter()
            .rev()
            .filter_map(|id| self.texts.get(id))
            .find(|t| t.contains_point(p))
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    // --- whole store ---

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.transitions.is_empty() && self.texts.is_empty()
    }

    /// Removes every element. The id generator is left untouched so ids are
    /// never reused within a session.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.transitions.clear();
        self.texts.clear();
        self.node_order.clear();
        self.transition_order.clear();
        self.text_order.clear();
    }
}
