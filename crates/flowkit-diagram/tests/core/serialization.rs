use flowkit_diagram::diagram::Diagram;
use flowkit_diagram::model::{ArrowMode, NodeShape, Orientation, Point};
use flowkit_diagram::serialization::{from_document, from_json, to_document, to_json};

#[test]
fn test_round_trip_preserves_elements() {
    let mut diagram = Diagram::new();
    let a = diagram.add_node(NodeShape::TerminalStart, 100.0, 100.0);
    let b = diagram.add_node(
        NodeShape::DataModel {
            fields: vec!["id".to_string(), "name".to_string()],
        },
        400.0,
        200.0,
    );
    let t = diagram.connect(a, b).unwrap();
    diagram.set_label(flowkit_core::ElementKind::Transition, t, "save").unwrap();
    diagram.set_arrow_mode(t, ArrowMode::Both).unwrap();
    diagram.add_break_point(t, 250.0, 300.0).unwrap();
    diagram.set_color(a, "#ffcc00").unwrap();
    let note = diagram.add_text("draft", 50.0, 500.0);

    let json = to_json(diagram.store()).unwrap();
    let restored = from_json(&json).unwrap();

    assert_eq!(restored.node_count(), 2);
    assert_eq!(restored.transition_count(), 1);
    assert_eq!(restored.text_count(), 1);

    let node = restored.get_node(a).unwrap();
    assert_eq!(node.color, "#ffcc00");
    assert_eq!(node.shape, NodeShape::TerminalStart);
    let table = restored.get_node(b).unwrap();
    assert!(
        matches!(&table.shape, NodeShape::DataModel { fields } if fields == &["id", "name"])
    );

    let transition = restored.get_transition(t).unwrap();
    assert_eq!(transition.label, "save");
    assert_eq!(transition.arrow_mode, ArrowMode::Both);
    assert_eq!(transition.break_points, vec![Point::new(250.0, 300.0)]);

    assert_eq!(restored.get_text(note).unwrap().label, "draft");
}

#[test]
fn test_round_trip_preserves_decision_structure() {
    let mut diagram = Diagram::new();
    let handles = diagram.add_decision(300.0, 300.0);
    diagram.rotate_decision(handles.decision).unwrap();

    let doc = to_document(diagram.store());
    let restored = from_document(&doc);

    let decision = restored.get_node(handles.decision).unwrap();
    assert_eq!(decision.orientation, Orientation::Deg90);

    // Both branches survive with their kind, corner, and slot intact, so a
    // further rotation keeps working on the restored store.
    let (first, second) = restored.branch_transitions_of(handles.decision).unwrap();
    assert_eq!(first, handles.first_branch);
    assert_eq!(second, handles.second_branch);
    assert!(restored.get_transition(first).unwrap().is_branch());
    assert_eq!(restored.get_transition(first).unwrap().arrow_mode, ArrowMode::None);
}

#[test]
fn test_loader_skips_transitions_with_missing_endpoints() {
    let json = r##"{
        "nodes": [
            {"id": 1, "x": 0.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "plain"}
        ],
        "transitions": [
            {"id": 2, "fromId": 1, "toId": 99, "label": "", "type": "plain", "style": "straight"}
        ],
        "texts": []
    }"##;
    let store = from_json(json).unwrap();
    assert_eq!(store.node_count(), 1);
    assert_eq!(store.transition_count(), 0);
}

#[test]
fn test_loader_skips_duplicate_pairs() {
    let json = r##"{
        "nodes": [
            {"id": 1, "x": 0.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "plain"},
            {"id": 2, "x": 100.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "plain"}
        ],
        "transitions": [
            {"id": 3, "fromId": 1, "toId": 2, "label": "", "type": "plain", "style": "straight"},
            {"id": 4, "fromId": 1, "toId": 2, "label": "", "type": "plain", "style": "curved"}
        ],
        "texts": []
    }"##;
    let store = from_json(json).unwrap();
    assert_eq!(store.transition_count(), 1);
    assert!(store.get_transition(3).is_some());
    assert!(store.get_transition(4).is_none());
}

#[test]
fn test_loader_reseeds_ids_past_loaded_maximum() {
    let json = r##"{
        "nodes": [
            {"id": 41, "x": 0.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "plain"}
        ],
        "transitions": [],
        "texts": []
    }"##;
    let mut store = from_json(json).unwrap();
    assert!(store.generate_id() > 41);
}

#[test]
fn test_missing_arrow_mode_defaults_per_kind() {
    let json = r##"{
        "nodes": [
            {"id": 1, "x": 0.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "decision"},
            {"id": 2, "x": 120.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "plain"},
            {"id": 3, "x": 0.0, "y": 120.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "plain"}
        ],
        "transitions": [
            {"id": 4, "fromId": 1, "toId": 2, "label": "true", "type": "branch-first", "style": "straight", "fromCorner": "right"},
            {"id": 5, "fromId": 3, "toId": 2, "label": "", "type": "plain", "style": "straight"}
        ],
        "texts": []
    }"##;
    let store = from_json(json).unwrap();
    assert_eq!(store.get_transition(4).unwrap().arrow_mode, ArrowMode::None);
    assert_eq!(store.get_transition(5).unwrap().arrow_mode, ArrowMode::Single);
}

#[test]
fn test_unknown_shape_record_is_skipped() {
    let json = r##"{
        "nodes": [
            {"id": 1, "x": 0.0, "y": 0.0, "r": 25.0, "label": "", "color": "#ffffff", "type": "hexagon"}
        ],
        "transitions": [],
        "texts": []
    }"##;
    let store = from_json(json).unwrap();
    assert_eq!(store.node_count(), 0);
}
