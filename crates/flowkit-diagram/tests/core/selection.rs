use flowkit_diagram::diagram::Diagram;
use flowkit_diagram::model::{Bounds, Node, NodeShape, Point, TextLabel, Transition};
use flowkit_diagram::selection::{select_in_rect, ElementRef, GroupSnapshot, MultiSelection};
use flowkit_diagram::store::DiagramStore;

#[test]
fn test_toggle_flips_membership() {
    let mut sel = MultiSelection::new();
    let el = ElementRef::node(1);
    assert!(sel.toggle(el));
    assert!(sel.contains(el));
    assert!(!sel.toggle(el));
    assert!(sel.is_empty());
}

#[test]
fn test_rect_selection_uses_bounds_overlap() {
    let mut store = DiagramStore::new();
    let inside = store.generate_id();
    store.insert_node(Node::new(
        inside,
        NodeShape::Plain,
        Point::new(100.0, 100.0),
        25.0,
    ));
    // Center outside the rectangle, but its bounding box overlaps the edge.
    let touching = store.generate_id();
    store.insert_node(Node::new(
        touching,
        NodeShape::Plain,
        Point::new(215.0, 100.0),
        25.0,
    ));
    let outside = store.generate_id();
    store.insert_node(Node::new(
        outside,
        NodeShape::Plain,
        Point::new(400.0, 100.0),
        25.0,
    ));
    let text = store.generate_id();
    store.insert_text(TextLabel::new(text, "note", Point::new(150.0, 150.0)));

    let mut sel = MultiSelection::new();
    select_in_rect(&store, &mut sel, Bounds::new(50.0, 50.0, 200.0, 200.0));

    assert_eq!(sel.len(), 3);
    assert!(sel.contains(ElementRef::node(inside)));
    assert!(sel.contains(ElementRef::node(touching)));
    assert!(!sel.contains(ElementRef::node(outside)));
    assert!(sel.contains(ElementRef::text(text)));
}

#[test]
fn test_rect_selection_takes_transition_by_connection_point() {
    let mut store = DiagramStore::new();
    let a = store.generate_id();
    store.insert_node(Node::new(a, NodeShape::Plain, Point::new(100.0, 100.0), 25.0));
    let b = store.generate_id();
    store.insert_node(Node::new(b, NodeShape::Plain, Point::new(500.0, 100.0), 25.0));
    let t = store.generate_id();
    store.insert_transition(Transition::new(t, a, b)).unwrap();

    // Rectangle around the source end only: one connection point inside is
    // enough.
    let mut sel = MultiSelection::new();
    select_in_rect(&store, &mut sel, Bounds::new(50.0, 50.0, 200.0, 200.0));
    assert!(sel.contains(ElementRef::transition(t)));

    // Rectangle over the middle of the span contains neither endpoint.
    select_in_rect(&store, &mut sel, Bounds::new(250.0, 50.0, 350.0, 200.0));
    assert!(!sel.contains(ElementRef::transition(t)));
}

#[test]
fn test_rect_selection_is_deterministic() {
    let mut store = DiagramStore::new();
    for i in 0..5 {
        let id = store.generate_id();
        store.insert_node(Node::new(
            id,
            NodeShape::Plain,
            Point::new(i as f64 * 60.0, 0.0),
            25.0,
        ));
    }
    let rect = Bounds::new(-30.0, -30.0, 130.0, 30.0);
    let mut first = MultiSelection::new();
    select_in_rect(&store, &mut first, rect);
    let mut second = MultiSelection::new();
    select_in_rect(&store, &mut second, rect);

    let mut a: Vec<u64> = first.iter().map(|el| el.id).collect();
    let mut b: Vec<u64> = second.iter().map(|el| el.id).collect();
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
}

#[test]
fn test_group_snapshot_translates_from_initial_positions() {
    let mut store = DiagramStore::new();
    let a = store.generate_id();
    store.insert_node(Node::new(a, NodeShape::Plain, Point::new(0.0, 0.0), 25.0));
    let b = store.generate_id();
    store.insert_node(Node::new(b, NodeShape::Plain, Point::new(200.0, 0.0), 25.0));
    let t = store.generate_id();
    let mut transition = Transition::new(t, a, b);
    transition.break_points.push(Point::new(100.0, 50.0));
    store.insert_transition(transition).unwrap();

    let mut sel = MultiSelection::new();
    sel.insert(ElementRef::node(a));
    sel.insert(ElementRef::node(b));
    sel.insert(ElementRef::transition(t));
    let snapshot = GroupSnapshot::capture(&store, &sel);

    // Two cumulative applications; the second supersedes the first instead
    // of stacking on it.
    snapshot.apply(&mut store, 10.0, 10.0);
    snapshot.apply(&mut store, 30.0, -20.0);

    assert_eq!(store.get_node(a).unwrap().position, Point::new(30.0, -20.0));
    assert_eq!(store.get_node(b).unwrap().position, Point::new(230.0, -20.0));
    assert_eq!(
        store.get_transition(t).unwrap().break_points[0],
        Point::new(130.0, 30.0)
    );
}

#[test]
fn test_group_snapshot_moves_break_points_once_for_shared_transition() {
    // Both endpoints selected: the connecting transition's break points
    // must translate by the delta exactly once.
    let mut store = DiagramStore::new();
    let a = store.generate_id();
    store.insert_node(Node::new(a, NodeShape::Plain, Point::new(0.0, 0.0), 25.0));
    let b = store.generate_id();
    store.insert_node(Node::new(b, NodeShape::Plain, Point::new(200.0, 0.0), 25.0));
    let t = store.generate_id();
    let mut transition = Transition::new(t, a, b);
    transition.break_points.push(Point::new(100.0, 0.0));
    store.insert_transition(transition).unwrap();

    let mut sel = MultiSelection::new();
    sel.insert(ElementRef::node(a));
    sel.insert(ElementRef::node(b));
    let snapshot = GroupSnapshot::capture(&store, &sel);
    snapshot.apply(&mut store, 25.0, 0.0);

    assert_eq!(
        store.get_transition(t).unwrap().break_points[0],
        Point::new(125.0, 0.0)
    );
}

#[test]
fn test_group_snapshot_carries_branch_targets_of_selected_decision() {
    let mut diagram = Diagram::new();
    let handles = diagram.add_decision(300.0, 300.0);

    let mut sel = MultiSelection::new();
    sel.insert(ElementRef::node(handles.decision));
    let snapshot = GroupSnapshot::capture(diagram.store(), &sel);
    snapshot.apply(diagram.store_mut(), 50.0, 0.0);

    assert_eq!(
        diagram.node(handles.decision).unwrap().position,
        Point::new(350.0, 300.0)
    );
    // Targets follow the diamond even though they were not selected.
    assert_eq!(
        diagram.node(handles.first_target).unwrap().position,
        Point::new(230.0, 300.0)
    );
    assert_eq!(
        diagram.node(handles.second_target).unwrap().position,
        Point::new(470.0, 300.0)
    );
}

#[test]
fn test_prune_drops_dead_references() {
    let mut store = DiagramStore::new();
    let a = store.generate_id();
    store.insert_node(Node::new(a, NodeShape::Plain, Point::new(0.0, 0.0), 25.0));

    let mut sel = MultiSelection::new();
    sel.insert(ElementRef::node(a));
    sel.insert(ElementRef::node(999));
    sel.prune(&store);

    assert_eq!(sel.len(), 1);
    assert!(sel.contains(ElementRef::node(a)));
}
