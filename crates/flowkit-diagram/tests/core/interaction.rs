use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flowkit_core::event_bus::{DiagramEvent, EventCategory, EventFilter, MutationEvent};
use flowkit_core::ElementKind;
use flowkit_diagram::diagram::Diagram;
use flowkit_diagram::model::{NodeShape, Point};
use flowkit_diagram::selection::ElementRef;

const SHIFT: flowkit_diagram::interaction::Modifiers =
    flowkit_diagram::interaction::Modifiers { multi_select: true };
const PLAIN: flowkit_diagram::interaction::Modifiers =
    flowkit_diagram::interaction::Modifiers { multi_select: false };

#[test]
fn test_node_drag_follows_pointer_at_fixed_offset() {
    let mut diagram = Diagram::new();
    let node = diagram.add_node(NodeShape::Plain, 100.0, 100.0);

    // Grab 10 units right of center; the node keeps that offset while
    // following the pointer.
    diagram.on_pointer_down(110.0, 100.0, PLAIN);
    assert_eq!(diagram.selection(), Some(ElementRef::node(node)));
    diagram.on_pointer_move(160.0, 130.0);
    diagram.on_pointer_up(160.0, 130.0);

    assert_eq!(diagram.node(node).unwrap().position, Point::new(150.0, 130.0));
}

#[test]
fn test_node_drag_translates_break_points_rigidly() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);
    let t = diagram.connect(a, b).unwrap();
    diagram.add_break_point(t, 250.0, 100.0).unwrap();

    diagram.on_pointer_down(100.0, 100.0, PLAIN);
    diagram.on_pointer_move(120.0, 130.0);
    diagram.on_pointer_up(120.0, 130.0);

    assert_eq!(diagram.node(a).unwrap().position, Point::new(120.0, 130.0));
    assert_eq!(
        diagram.transition(t).unwrap().break_points[0],
        Point::new(270.0, 130.0)
    );
    // The other endpoint stays put.
    assert_eq!(diagram.node(b).unwrap().position, Point::new(400.0, 100.0));
}

#[test]
fn test_decision_drag_carries_branch_targets() {
    let mut diagram = Diagram::new();
    let handles = diagram.add_decision(300.0, 300.0);

    diagram.on_pointer_down(300.0, 300.0, PLAIN);
    diagram.on_pointer_move(340.0, 310.0);
    diagram.on_pointer_up(340.0, 310.0);

    assert_eq!(
        diagram.node(handles.decision).unwrap().position,
        Point::new(340.0, 310.0)
    );
    assert_eq!(
        diagram.node(handles.first_target).unwrap().position,
        Point::new(220.0, 310.0)
    );
    assert_eq!(
        diagram.node(handles.second_target).unwrap().position,
        Point::new(460.0, 310.0)
    );
}

#[test]
fn test_decision_drag_preserves_independent_target_offsets() {
    let mut diagram = Diagram::new();
    let handles = diagram.add_decision(300.0, 300.0);
    // Nudge one target off its canonical radial position.
    diagram.move_node(handles.first_target, 0.0, -40.0).unwrap();
    assert_eq!(
        diagram.node(handles.first_target).unwrap().position,
        Point::new(180.0, 260.0)
    );

    // Dragging the diamond translates targets rigidly; the offset survives.
    diagram.on_pointer_down(300.0, 300.0, PLAIN);
    diagram.on_pointer_move(350.0, 300.0);
    diagram.on_pointer_up(350.0, 300.0);

    assert_eq!(
        diagram.node(handles.first_target).unwrap().position,
        Point::new(230.0, 260.0)
    );

    // Rotation, by contrast, snaps the target back to the radial distance.
    diagram.rotate_decision(handles.decision).unwrap();
    assert_eq!(
        diagram.node(handles.first_target).unwrap().position,
        Point::new(350.0, 180.0)
    );
}

#[test]
fn test_break_point_click_without_movement_emits_no_move_event() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);
    let t = diagram.connect(a, b).unwrap();
    diagram.add_break_point(t, 250.0, 100.0).unwrap();

    let moves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&moves);
    diagram.subscribe(
        EventFilter::Categories(vec![EventCategory::Mutation]),
        move |event| {
            if let DiagramEvent::Mutation(MutationEvent::BreakPointsMoved { .. }) = event {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        },
    );

    // A stationary press on the break point selects but moves nothing.
    diagram.on_pointer_down(250.0, 100.0, PLAIN);
    diagram.on_pointer_up(250.0, 100.0);
    assert_eq!(moves.load(Ordering::SeqCst), 0);

    // A real drag emits exactly one.
    diagram.on_pointer_down(250.0, 100.0, PLAIN);
    diagram.on_pointer_move(250.0, 160.0);
    diagram.on_pointer_up(250.0, 160.0);
    assert_eq!(moves.load(Ordering::SeqCst), 1);
    assert_eq!(
        diagram.transition(t).unwrap().break_points[0],
        Point::new(250.0, 160.0)
    );
}

#[test]
fn test_pending_press_below_threshold_is_a_click() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);
    let t = diagram.connect(a, b).unwrap();
    diagram.add_break_point(t, 300.0, 140.0).unwrap();

    // Press on the path, wiggle under the promotion threshold, release.
    diagram.on_pointer_down(200.0, 112.0, PLAIN);
    diagram.on_pointer_move(203.0, 114.0);
    diagram.on_pointer_up(203.0, 114.0);

    assert_eq!(diagram.selection(), Some(ElementRef::transition(t)));
    assert_eq!(
        diagram.transition(t).unwrap().break_points[0],
        Point::new(300.0, 140.0)
    );
}

#[test]
fn test_pending_press_past_threshold_drags_whole_transition() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);
    let t = diagram.connect(a, b).unwrap();
    diagram.add_break_point(t, 300.0, 140.0).unwrap();

    diagram.on_pointer_down(200.0, 112.0, PLAIN);
    // 8 > 5 on the x axis: the press promotes and every break point
    // translates by the cumulative pointer delta.
    diagram.on_pointer_move(208.0, 112.0);
    diagram.on_pointer_up(208.0, 112.0);

    assert_eq!(
        diagram.transition(t).unwrap().break_points[0],
        Point::new(308.0, 140.0)
    );
}

#[test]
fn test_modifier_click_builds_multi_selection_then_group_drags() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 300.0, 100.0);

    diagram.on_pointer_down(100.0, 100.0, SHIFT);
    diagram.on_pointer_up(100.0, 100.0);
    diagram.on_pointer_down(300.0, 100.0, SHIFT);
    diagram.on_pointer_up(300.0, 100.0);
    assert_eq!(diagram.multi_selection().len(), 2);
    assert_eq!(diagram.selection(), None);

    // A plain press on any member drags the whole group.
    diagram.on_pointer_down(100.0, 100.0, PLAIN);
    diagram.on_pointer_move(130.0, 120.0);
    diagram.on_pointer_up(130.0, 120.0);

    assert_eq!(diagram.node(a).unwrap().position, Point::new(130.0, 120.0));
    assert_eq!(diagram.node(b).unwrap().position, Point::new(330.0, 120.0));
    assert_eq!(diagram.multi_selection().len(), 2);
}

#[test]
fn test_modifier_click_toggles_membership_off() {
    let mut diagram = Diagram::new();
    diagram.add_node(NodeShape::Plain, 100.0, 100.0);

    diagram.on_pointer_down(100.0, 100.0, SHIFT);
    diagram.on_pointer_up(100.0, 100.0);
    assert_eq!(diagram.multi_selection().len(), 1);

    diagram.on_pointer_down(100.0, 100.0, SHIFT);
    diagram.on_pointer_up(100.0, 100.0);
    assert!(diagram.multi_selection().is_empty());
}

#[test]
fn test_rect_selection_gesture_on_empty_space() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 200.0, 100.0);
    let far = diagram.add_node(NodeShape::Plain, 700.0, 500.0);

    diagram.on_pointer_down(40.0, 40.0, PLAIN);
    diagram.on_pointer_move(260.0, 160.0);
    diagram.on_pointer_up(260.0, 160.0);

    let multi = diagram.multi_selection();
    assert_eq!(multi.len(), 2);
    assert!(multi.contains(ElementRef::node(a)));
    assert!(multi.contains(ElementRef::node(b)));
    assert!(!multi.contains(ElementRef::node(far)));
}

#[test]
fn test_break_point_drag_clamps_to_canvas_margin() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);
    let t = diagram.connect(a, b).unwrap();
    diagram.add_break_point(t, 250.0, 100.0).unwrap();

    diagram.on_pointer_down(250.0, 100.0, PLAIN);
    diagram.on_pointer_move(-80.0, 400.0);
    diagram.on_pointer_up(-80.0, 400.0);

    // Clamped 10 units inside the canvas edge.
    assert_eq!(
        diagram.transition(t).unwrap().break_points[0],
        Point::new(10.0, 400.0)
    );
}

#[test]
fn test_connection_gesture_completes_on_target_node() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);

    diagram.begin_connect(a).unwrap();
    assert_eq!(diagram.pending_connection(), Some(a));
    diagram.on_pointer_down(400.0, 100.0, PLAIN);
    diagram.on_pointer_up(400.0, 100.0);

    assert_eq!(diagram.pending_connection(), None);
    assert_eq!(diagram.store().transition_count(), 1);
    let t = diagram.transitions().next().unwrap();
    assert_eq!((t.from, t.to), (a, b));
}

#[test]
fn test_connection_gesture_rejects_duplicates_and_empty_space() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);
    let b = diagram.add_node(NodeShape::Plain, 400.0, 100.0);
    diagram.connect(a, b).unwrap();

    // Target already connected: the gesture cancels, nothing is added.
    diagram.begin_connect(a).unwrap();
    diagram.on_pointer_down(400.0, 100.0, PLAIN);
    diagram.on_pointer_up(400.0, 100.0);
    assert_eq!(diagram.store().transition_count(), 1);

    // Empty space aborts too.
    diagram.begin_connect(b).unwrap();
    diagram.on_pointer_down(700.0, 700.0, PLAIN);
    diagram.on_pointer_up(700.0, 700.0);
    assert_eq!(diagram.store().transition_count(), 1);
    assert_eq!(diagram.pending_connection(), None);
}

#[test]
fn test_escape_cancels_connection_then_clears_multi() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::Plain, 100.0, 100.0);

    diagram.begin_connect(a).unwrap();
    diagram.on_escape();
    assert_eq!(diagram.pending_connection(), None);

    diagram.on_pointer_down(100.0, 100.0, SHIFT);
    diagram.on_pointer_up(100.0, 100.0);
    assert_eq!(diagram.multi_selection().len(), 1);
    diagram.on_escape();
    assert!(diagram.multi_selection().is_empty());
}

#[test]
fn test_drag_emits_move_event_click_does_not() {
    let mut diagram = Diagram::new();
    let node = diagram.add_node(NodeShape::Plain, 100.0, 100.0);

    let moves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&moves);
    diagram.subscribe(
        EventFilter::Categories(vec![EventCategory::Mutation]),
        move |event| {
            if let DiagramEvent::Mutation(MutationEvent::ElementMoved {
                kind: ElementKind::Node,
                ..
            }) = event
            {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        },
    );

    // A stationary click: no move event.
    diagram.on_pointer_down(100.0, 100.0, PLAIN);
    diagram.on_pointer_up(100.0, 100.0);
    assert_eq!(moves.load(Ordering::SeqCst), 0);

    // A real drag: exactly one.
    diagram.on_pointer_down(100.0, 100.0, PLAIN);
    diagram.on_pointer_move(150.0, 100.0);
    diagram.on_pointer_up(150.0, 100.0);
    assert_eq!(moves.load(Ordering::SeqCst), 1);
    assert_eq!(diagram.node(node).unwrap().position, Point::new(150.0, 100.0));
}
