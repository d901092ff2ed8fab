//! The `Diagram` facade.
//!
//! Owns the element store, selection state, interaction machine, event bus,
//! and canvas bounds, and exposes the command and query surface a host
//! application drives. Hosts render from the queries and react to bus
//! events; the facade itself never draws.

use flowkit_core::constants::{
    BRANCH_TARGET_DISTANCE, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_NODE_RADIUS,
};
use flowkit_core::event_bus::{
    DiagramEvent, EventBus, EventFilter, MutationEvent, SelectionEvent, SubscriptionId,
};
use flowkit_core::{DiagramError, ElementKind, Result};

use crate::arrows::{self, ArrowPlacement};
use crate::interaction::{self, InteractionController, Modifiers};
use crate::model::{
    ArrowMode, Bounds, BranchSlot, Node, NodeShape, Point, TextLabel, Transition,
};
use crate::path;
use crate::routing::{self, ConnectionPoints};
use crate::selection::{ElementRef, MultiSelection};
use crate::store::DiagramStore;

/// Ids produced when a decision node is created: the diamond itself, its
/// two target nodes, and the two protected branch transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionHandles {
    pub decision: u64,
    pub first_target: u64,
    pub second_target: u64,
    pub first_branch: u64,
    pub second_branch: u64,
}

/// An interactive flowchart diagram.
#[derive(Debug)]
pub struct Diagram {
    store: DiagramStore,
    multi: MultiSelection,
    interaction: InteractionController,
    bus: EventBus,
    canvas: Bounds,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::with_canvas_size(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }

    pub fn with_canvas_size(width: f64, height: f64) -> Self {
        Self {
            store: DiagramStore::new(),
            multi: MultiSelection::new(),
            interaction: InteractionController::new(),
            bus: EventBus::new(),
            canvas: Bounds::new(0.0, 0.0, width, height),
        }
    }

    // --- element commands ---

    /// Creates a node of the given shape at (x, y) and returns its id.
    ///
    /// Decision nodes should normally be created through
    /// [`add_decision`](Self::add_decision), which also builds their branch
    /// structure; a bare decision created here starts without branches.
    pub fn add_node(&mut self, shape: NodeShape, x: f64, y: f64) -> u64 {
        let id = self.store.generate_id();
        let node = Node::new(id, shape, Point::new(x, y), DEFAULT_NODE_RADIUS);
        self.store.insert_node(node);
        self.publish_created(ElementKind::Node, id);
        id
    }

    /// Creates a decision diamond with its two target nodes and the two
    /// protected branch transitions, laid out per the default orientation.
    pub fn add_decision(&mut self, x: f64, y: f64) -> DecisionHandles {
        let center = Point::new(x, y);
        let decision = self.add_node(NodeShape::Decision, x, y);
        let orientation = self
            .store
            .get_node(decision)
            .map(|n| n.orientation)
            .unwrap_or_default();
        let (first_corner, second_corner) = orientation.branch_corners();

        let mut spawn_arm = |slot: BranchSlot, corner, label: &str| {
            let (ox, oy) = crate::model::AnchorCorner::outward(corner);
            let target = self.add_node(
                NodeShape::Plain,
                center.x + ox * BRANCH_TARGET_DISTANCE,
                center.y + oy * BRANCH_TARGET_DISTANCE,
            );
            let branch = self.store.generate_id();
            // Both endpoints were just created, so the insert cannot fail.
            let _ = self
                .store
                .insert_transition(Transition::branch(branch, decision, target, slot, corner, label));
            self.publish_created(ElementKind::Transition, branch);
            (target, branch)
        };

        let (first_target, first_branch) = spawn_arm(BranchSlot::First, first_corner, "true");
        let (second_target, second_branch) = spawn_arm(BranchSlot::Second, second_corner, "false");

        DecisionHandles {
            decision,
            first_target,
            second_target,
            first_branch,
            second_branch,
        }
    }

    /// Creates a free-floating text label and returns its id.
    pub fn add_text(&mut self, label: &str, x: f64, y: f64) -> u64 {
        let id = self.store.generate_id();
        self.store.insert_text(TextLabel::new(id, label, Point::new(x, y)));
        self.publish_created(ElementKind::Text, id);
        id
    }

    /// Creates an ordinary transition between two existing nodes. Rejects
    /// unknown endpoints and duplicate ordered (from, to) pairs.
    pub fn connect(&mut self, from: u64, to: u64) -> Result<u64> {
        let id = self.store.generate_id();
        self.store.insert_transition(Transition::new(id, from, to))?;
        self.publish_created(ElementKind::Transition, id);
        Ok(id)
    }

    /// Arms interactive connection drawing from a node; the next pointer
    /// press on another node completes the transition.
    pub fn begin_connect(&mut self, from: u64) -> Result<()> {
        self.interaction.begin_connection(&self.store, &self.bus, from)
    }

    /// Deletes a node and every transition touching it, pruning any
    /// selection that referenced the removed elements.
    pub fn remove_node(&mut self, id: u64) -> Result<()> {
        let (node, transitions) = self.store.remove_node(id)?;
        for t in &transitions {
            self.publish_deleted(ElementKind::Transition, t.id);
        }
        self.publish_deleted(ElementKind::Node, node.id);
        self.prune_selection();
        Ok(())
    }

    pub fn remove_text(&mut self, id: u64) -> Result<()> {
        let text = self.store.remove_text(id)?;
        self.publish_deleted(ElementKind::Text, text.id);
        self.prune_selection();
        Ok(())
    }

    /// Deletes an ordinary transition. Decision branches can only die with
    /// their nodes, never on their own.
    pub fn remove_transition(&mut self, id: u64) -> Result<()> {
        let is_branch = self
            .store
            .get_transition(id)
            .ok_or(DiagramError::UnknownTransition { id })?
            .is_branch();
        if is_branch {
            return Err(DiagramError::ProtectedTransition {
                id,
                action: "deleted",
            });
        }
        self.store.remove_transition(id)?;
        self.publish_deleted(ElementKind::Transition, id);
        self.prune_selection();
        Ok(())
    }

    /// Removes every element. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.store.clear();
        self.multi.clear();
        self.interaction.clear_selection();
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::DiagramCleared));
    }

    // --- mutation commands ---

    /// Moves a node by a delta. Break points of touching transitions follow
    /// rigidly, and a decision node carries its branch targets along.
    pub fn move_node(&mut self, id: u64, dx: f64, dy: f64) -> Result<()> {
        if self.store.get_node(id).is_none() {
            return Err(DiagramError::UnknownNode { id });
        }
        interaction::translate_node(&mut self.store, id, dx, dy);
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::ElementMoved {
                kind: ElementKind::Node,
                id,
                dx,
                dy,
            }));
        Ok(())
    }

    pub fn move_text(&mut self, id: u64, dx: f64, dy: f64) -> Result<()> {
        let text = self
            .store
            .get_text_mut(id)
            .ok_or(DiagramError::UnknownText { id })?;
        text.position = text.position.translated(dx, dy);
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::ElementMoved {
                kind: ElementKind::Text,
                id,
                dx,
                dy,
            }));
        Ok(())
    }

    /// Rotates a decision node 90 degrees clockwise, re-deriving branch
    /// corners and repositioning both branch targets.
    pub fn rotate_decision(&mut self, id: u64) -> Result<()> {
        let orientation = routing::rotate_decision_node(&mut self.store, id)?;
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::NodeRotated {
                id,
                degrees: orientation.degrees(),
            }));
        Ok(())
    }

    /// Toggles a transition between straight and curved rendering. Branch
    /// transitions keep their fixed style.
    pub fn toggle_style(&mut self, id: u64) -> Result<()> {
        let transition = self
            .store
            .get_transition_mut(id)
            .ok_or(DiagramError::UnknownTransition { id })?;
        if transition.is_branch() {
            return Err(DiagramError::ProtectedTransition {
                id,
                action: "restyled",
            });
        }
        transition.style = transition.style.toggled();
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::TransitionRestyled {
                id,
            }));
        Ok(())
    }

    /// Sets a transition's arrowhead configuration. Branch transitions
    /// never render arrowheads.
    pub fn set_arrow_mode(&mut self, id: u64, mode: ArrowMode) -> Result<()> {
        let transition = self
            .store
            .get_transition_mut(id)
            .ok_or(DiagramError::UnknownTransition { id })?;
        if transition.is_branch() {
            return Err(DiagramError::ProtectedTransition {
                id,
                action: "given arrowheads",
            });
        }
        transition.arrow_mode = mode;
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::TransitionRestyled {
                id,
            }));
        Ok(())
    }

    /// Replaces the label of any element kind.
    pub fn set_label(&mut self, kind: ElementKind, id: u64, label: &str) -> Result<()> {
        match kind {
            ElementKind::Node => {
                self.store
                    .get_node_mut(id)
                    .ok_or(DiagramError::UnknownNode { id })?
                    .label = label.to_string();
            }
            ElementKind::Text => {
                self.store
                    .get_text_mut(id)
                    .ok_or(DiagramError::UnknownText { id })?
                    .label = label.to_string();
            }
            ElementKind::Transition => {
                self.store
                    .get_transition_mut(id)
                    .ok_or(DiagramError::UnknownTransition { id })?
                    .label = label.to_string();
            }
        }
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::LabelChanged {
                kind,
                id,
            }));
        Ok(())
    }

    /// Sets a node's fill color (any renderer-understood color string).
    pub fn set_color(&mut self, id: u64, color: &str) -> Result<()> {
        self.store
            .get_node_mut(id)
            .ok_or(DiagramError::UnknownNode { id })?
            .color = color.to_string();
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::ColorChanged { id }));
        Ok(())
    }

    // --- break points ---

    /// Inserts a break point into the transition's path at the segment
    /// nearest the click. Returns its index within the break-point list.
    pub fn add_break_point(&mut self, transition: u64, x: f64, y: f64) -> Result<usize> {
        let index = path::add_break_point(&mut self.store, transition, x, y)?;
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::BreakPointsChanged {
                transition,
            }));
        Ok(index)
    }

    /// Removes the break point nearest (x, y) when within the removal
    /// radius; a miss is a no-op. Returns whether a point was removed.
    pub fn remove_break_point(&mut self, transition: u64, x: f64, y: f64) -> Result<bool> {
        let removed = path::remove_break_point(&mut self.store, transition, x, y)?;
        if removed {
            self.bus
                .publish(DiagramEvent::Mutation(MutationEvent::BreakPointsChanged {
                    transition,
                }));
        }
        Ok(removed)
    }

    /// Repositions an existing break point by index.
    pub fn move_break_point(
        &mut self,
        transition: u64,
        index: usize,
        x: f64,
        y: f64,
    ) -> Result<()> {
        let t = self
            .store
            .get_transition_mut(transition)
            .ok_or(DiagramError::UnknownTransition { id: transition })?;
        let len = t.break_points.len();
        let bp = t
            .break_points
            .get_mut(index)
            .ok_or(DiagramError::BreakPointOutOfRange { index, len })?;
        *bp = Point::new(x, y);
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::BreakPointsMoved {
                transition,
            }));
        Ok(())
    }

    /// Drops every break point of a transition, restoring its direct path.
    pub fn clear_break_points(&mut self, transition: u64) -> Result<()> {
        let t = self
            .store
            .get_transition_mut(transition)
            .ok_or(DiagramError::UnknownTransition { id: transition })?;
        if !t.break_points.is_empty() {
            t.break_points.clear();
            self.bus
                .publish(DiagramEvent::Mutation(MutationEvent::BreakPointsChanged {
                    transition,
                }));
        }
        Ok(())
    }

    // --- pointer entry points ---

    pub fn on_pointer_down(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        self.interaction.pointer_down(
            &mut self.store,
            &mut self.multi,
            &self.bus,
            Point::new(x, y),
            modifiers,
        );
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.interaction
            .pointer_move(&mut self.store, self.canvas, Point::new(x, y));
    }

    pub fn on_pointer_up(&mut self, x: f64, y: f64) {
        self.interaction
            .pointer_up(&mut self.store, &mut self.multi, &self.bus, Point::new(x, y));
    }

    pub fn on_escape(&mut self) {
        self.interaction.escape(&mut self.multi, &self.bus);
    }

    // --- queries ---

    pub fn store(&self) -> &DiagramStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DiagramStore {
        &mut self.store
    }

    pub fn node(&self, id: u64) -> Option<&Node> {
        self.store.get_node(id)
    }

    pub fn transition(&self, id: u64) -> Option<&Transition> {
        self.store.get_transition(id)
    }

    pub fn text(&self, id: u64) -> Option<&TextLabel> {
        self.store.get_text(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.store.nodes()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.store.transitions()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextLabel> {
        self.store.texts()
    }

    /// The current single selection, if any.
    pub fn selection(&self) -> Option<ElementRef> {
        self.interaction.selection()
    }

    pub fn multi_selection(&self) -> &MultiSelection {
        &self.multi
    }

    /// Source node of an in-progress connection gesture, if any.
    pub fn pending_connection(&self) -> Option<u64> {
        self.interaction.pending_connection()
    }

    /// Visual start/end points of a transition.
    pub fn connection_points(&self, id: u64) -> Result<ConnectionPoints> {
        let t = self
            .store
            .get_transition(id)
            .ok_or(DiagramError::UnknownTransition { id })?;
        Ok(routing::connection_points(&self.store, t))
    }

    /// The full polyline of a transition (start, break points, end; or the
    /// branch arm for decision branches).
    pub fn path_points(&self, id: u64) -> Result<Vec<Point>> {
        let t = self
            .store
            .get_transition(id)
            .ok_or(DiagramError::UnknownTransition { id })?;
        Ok(path::path_points(&self.store, t))
    }

    /// The arrowheads a transition renders.
    pub fn arrowheads(&self, id: u64) -> Result<Vec<ArrowPlacement>> {
        let t = self
            .store
            .get_transition(id)
            .ok_or(DiagramError::UnknownTransition { id })?;
        Ok(arrows::arrowheads(&self.store, t))
    }

    pub fn canvas_bounds(&self) -> Bounds {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = Bounds::new(0.0, 0.0, width, height);
    }

    /// The diagram's event bus, for host subscriptions.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Convenience wrapper around [`EventBus::subscribe`].
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&DiagramEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(filter, handler)
    }

    // --- internal ---

    fn publish_created(&self, kind: ElementKind, id: u64) {
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::ElementCreated {
                kind,
                id,
            }));
    }

    fn publish_deleted(&self, kind: ElementKind, id: u64) {
        self.bus
            .publish(DiagramEvent::Mutation(MutationEvent::ElementDeleted {
                kind,
                id,
            }));
    }

    fn prune_selection(&mut self) {
        self.multi.prune(&self.store);
        if let Some(sel) = self.interaction.selection() {
            let alive = match sel.kind {
                ElementKind::Node => self.store.get_node(sel.id).is_some(),
                ElementKind::Text => self.store.get_text(sel.id).is_some(),
                ElementKind::Transition => self.store.get_transition(sel.id).is_some(),
            };
            if !alive {
                self.interaction.clear_selection();
                self.bus
                    .publish(DiagramEvent::Selection(SelectionEvent::Cleared));
            }
        }
    }
}
