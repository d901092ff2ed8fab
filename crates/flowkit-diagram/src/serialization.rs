//! Flat JSON document model for saving and loading diagrams.
//!
//! Records are deliberately plain: elements keyed by id, positions as bare
//! coordinates, shape/kind/style carried as stable string names so the
//! format survives enum changes. Loading is lenient: records that reference
//! missing nodes or duplicate an existing pair are skipped with a log line
//! rather than failing the whole document.

use serde::{Deserialize, Serialize};

use flowkit_core::constants::DEFAULT_NODE_RADIUS;

use crate::model::{
    AnchorCorner, ArrowMode, Node, NodeShape, Orientation, Point, TextLabel, Transition,
    TransitionKind, TransitionStyle,
};
use crate::store::DiagramStore;

/// Serialized form of a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub label: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub rotation: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Serialized form of a transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    pub id: u64,
    pub from_id: u64,
    pub to_id: u64,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub style: String,
    #[serde(default)]
    pub arrow_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_corner: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub break_points: Vec<Point>,
}

/// Serialized form of a free text label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// A complete diagram document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
    #[serde(default)]
    pub texts: Vec<TextRecord>,
}

/// Snapshots a store into its document form, in draw order.
pub fn to_document(store: &DiagramStore) -> DiagramDocument {
    DiagramDocument {
        nodes: store.nodes().map(node_record).collect(),
        transitions: store.transitions().map(transition_record).collect(),
        texts: store.texts().map(text_record).collect(),
    }
}

/// Rebuilds a store from a document.
///
/// Invalid records are skipped, not fatal: a transition whose endpoint is
/// missing, or that duplicates an already-loaded pair, logs a warning and is
/// dropped. The id generator is reseeded past the highest loaded id so new
/// elements never collide with loaded ones.
pub fn from_document(doc: &DiagramDocument) -> DiagramStore {
    let mut store = DiagramStore::new();
    let mut max_id = 0;

    for record in &doc.nodes {
        let Some(node) = node_from_record(record) else {
            tracing::warn!(id = record.id, kind = %record.kind, "skipping node with unknown shape");
            continue;
        };
        max_id = max_id.max(node.id);
        store.insert_node(node);
    }
    for record in &doc.texts {
        max_id = max_id.max(record.id);
        store.insert_text(TextLabel::new(
            record.id,
            &record.label,
            Point::new(record.x, record.y),
        ));
    }
    for record in &doc.transitions {
        let Some(transition) = transition_from_record(record) else {
            tracing::warn!(id = record.id, "skipping malformed transition record");
            continue;
        };
        let id = transition.id;
        if let Err(err) = store.insert_transition(transition) {
            tracing::warn!(id, %err, "skipping transition record");
            continue;
        }
        max_id = max_id.max(id);
    }

    store.reseed_ids_above(max_id);
    store
}

/// Serializes a store to pretty-printed JSON.
pub fn to_json(store: &DiagramStore) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_document(store))
}

/// Deserializes a store from JSON produced by [`to_json`].
pub fn from_json(json: &str) -> serde_json::Result<DiagramStore> {
    let doc: DiagramDocument = serde_json::from_str(json)?;
    Ok(from_document(&doc))
}

fn node_record(node: &Node) -> NodeRecord {
    let fields = match &node.shape {
        NodeShape::DataModel { fields } => fields.clone(),
        _ => Vec::new(),
    };
    NodeRecord {
        id: node.id,
        x: node.position.x,
        y: node.position.y,
        r: node.radius,
        label: node.label.clone(),
        color: node.color.clone(),
        kind: node.shape.type_name().to_string(),
        rotation: node.orientation.degrees(),
        fields,
    }
}

fn node_from_record(record: &NodeRecord) -> Option<Node> {
    let mut shape = NodeShape::from_type_name(&record.kind)?;
    if let NodeShape::DataModel { fields } = &mut shape {
        *fields = record.fields.clone();
    }
    let radius = if record.r > 0.0 {
        record.r
    } else {
        DEFAULT_NODE_RADIUS
    };
    let mut node = Node::new(record.id, shape, Point::new(record.x, record.y), radius);
    node.label = record.label.clone();
    node.color = record.color.clone();
    node.orientation = Orientation::from_degrees(record.rotation).unwrap_or_default();
    Some(node)
}

fn text_record(text: &TextLabel) -> TextRecord {
    TextRecord {
        id: text.id,
        x: text.position.x,
        y: text.position.y,
        label: text.label.clone(),
    }
}

fn transition_record(t: &Transition) -> TransitionRecord {
    TransitionRecord {
        id: t.id,
        from_id: t.from,
        to_id: t.to,
        label: t.label.clone(),
        kind: t.kind.type_name().to_string(),
        style: t.style.type_name().to_string(),
        arrow_mode: arrow_mode_name(t.arrow_mode).to_string(),
        from_corner: t.from_corner.map(|c| c.type_name().to_string()),
        break_points: t.break_points.clone(),
    }
}

fn transition_from_record(record: &TransitionRecord) -> Option<Transition> {
    let kind = TransitionKind::from_type_name(&record.kind)?;
    let mut t = Transition::new(record.id, record.from_id, record.to_id);
    t.label = record.label.clone();
    t.kind = kind;
    t.style = TransitionStyle::from_type_name(&record.style)?;
    t.arrow_mode = arrow_mode_from_name(&record.arrow_mode, t.is_branch())?;
    t.from_corner = match &record.from_corner {
        Some(name) => Some(AnchorCorner::from_type_name(name)?),
        None => None,
    };
    t.break_points = record.break_points.clone();
    Some(t)
}

fn arrow_mode_name(mode: ArrowMode) -> &'static str {
    match mode {
        ArrowMode::Single => "single",
        ArrowMode::Both => "both",
        ArrowMode::None => "none",
    }
}

/// Older documents omitted the arrow mode; it defaults per transition kind.
fn arrow_mode_from_name(name: &str, is_branch: bool) -> Option<ArrowMode> {
    match name {
        "single" => Some(ArrowMode::Single),
        "both" => Some(ArrowMode::Both),
        "none" => Some(ArrowMode::None),
        "" => Some(if is_branch {
            ArrowMode::None
        } else {
            ArrowMode::Single
        }),
        _ => None,
    }
}
