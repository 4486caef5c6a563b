/// Flow normalization
///
/// Converts an untrusted, possibly partial JSON blob (file upload, pasted
/// text, LLM output) into the canonical `Flow`. Normalization is total: it
/// never fails, it only defaults. Referential integrity of connections is
/// NOT checked here; callers run the validator and/or connection repair
/// afterwards.

use crate::flow::types::{ConnectionTarget, Flow, FlowNode, NodeConnections};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Fallback node kind for nodes without a usable type tag
pub const STUB_NODE_TYPE: &str = "n8n-nodes-base.stub";

/// Fallback flow name for imports without one
pub const IMPORTED_FLOW_NAME: &str = "Imported Flow";

/// Normalize a raw JSON value into a canonical flow
///
/// Every node comes out with a non-empty id, a unique-by-position fallback
/// name, a type tag, a numeric type version, and a two-element position.
/// Missing top-level fields default to an importable empty shape.
pub fn normalize(raw: &Value) -> Flow {
    let raw_nodes = raw
        .get("nodes")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let nodes = raw_nodes
        .iter()
        .enumerate()
        .map(|(i, node)| normalize_node(node, i))
        .collect();

    Flow {
        name: non_empty_string(raw.get("name")).unwrap_or_else(|| IMPORTED_FLOW_NAME.to_string()),
        nodes,
        connections: normalize_connections(raw.get("connections")),
        active: raw.get("active").and_then(Value::as_bool).unwrap_or(false),
        description: non_empty_string(raw.get("description")),
        tags: raw.get("tags").and_then(|t| {
            serde_json::from_value::<Vec<String>>(t.clone()).ok()
        }),
        settings: raw.get("settings").filter(|s| s.is_object()).cloned(),
    }
}

/// Normalize a single node at sequence position `index`
///
/// The name fallback is positionally unique ("Node {i+1}") rather than a
/// shared literal, so the name-keyed connection map stays unambiguous even
/// when several nodes arrive unnamed.
fn normalize_node(node: &Value, index: usize) -> FlowNode {
    FlowNode {
        id: non_empty_string(node.get("id")).unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: non_empty_string(node.get("name")).unwrap_or_else(|| format!("Node {}", index + 1)),
        node_type: non_empty_string(node.get("type")).unwrap_or_else(|| STUB_NODE_TYPE.to_string()),
        type_version: node
            .get("typeVersion")
            .and_then(Value::as_f64)
            .map(|v| v as i64)
            .unwrap_or(1),
        position: normalize_position(node.get("position")),
        parameters: node
            .get("parameters")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_else(Map::new),
        credentials: node.get("credentials").filter(|c| !c.is_null()).cloned(),
    }
}

/// Coerce a raw connections object entry by entry
///
/// Author wiring survives even when individual targets arrive partial:
/// a target missing "type" or "index" gets the defaults instead of taking
/// the whole map down with it. Only individually unusable pieces are
/// dropped: targets without a node name, slots that are not arrays, and
/// source entries without a "main" array.
fn normalize_connections(raw: Option<&Value>) -> BTreeMap<String, NodeConnections> {
    let mut connections = BTreeMap::new();
    let Some(raw) = raw.and_then(Value::as_object) else {
        return connections;
    };
    for (source, channels) in raw {
        let Some(slots) = channels.get("main").and_then(Value::as_array) else {
            continue;
        };
        let main = slots
            .iter()
            .filter_map(Value::as_array)
            .map(|slot| slot.iter().filter_map(normalize_target).collect())
            .collect();
        connections.insert(source.clone(), NodeConnections { main });
    }
    connections
}

fn normalize_target(raw: &Value) -> Option<ConnectionTarget> {
    let node = raw
        .get("node")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    Some(ConnectionTarget {
        node: node.to_string(),
        channel: raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("main")
            .to_string(),
        index: raw.get("index").and_then(Value::as_u64).unwrap_or(0) as u32,
    })
}

fn normalize_position(raw: Option<&Value>) -> [f64; 2] {
    let pair = raw.and_then(Value::as_array);
    match pair {
        Some(pair) if pair.len() == 2 => {
            let x = pair[0].as_f64();
            let y = pair[1].as_f64();
            match (x, y) {
                (Some(x), Some(y)) => [x, y],
                _ => [0.0, 0.0],
            }
        }
        _ => [0.0, 0.0],
    }
}

fn non_empty_string(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_input_yields_importable_shape() {
        let flow = normalize(&json!({}));
        assert_eq!(flow.name, IMPORTED_FLOW_NAME);
        assert!(flow.nodes.is_empty());
        assert!(flow.connections.is_empty());
        assert!(!flow.active);
    }

    #[test]
    fn nodes_always_get_required_fields() {
        let flow = normalize(&json!({
            "nodes": [{}, {"name": "Webhook"}, {"typeVersion": "bogus", "position": [1]}]
        }));
        for (i, node) in flow.nodes.iter().enumerate() {
            assert!(!node.id.is_empty(), "node {i} missing id");
            assert!(!node.name.is_empty(), "node {i} missing name");
            assert!(!node.node_type.is_empty(), "node {i} missing type");
            assert_eq!(node.position.len(), 2);
        }
        assert_eq!(flow.nodes[0].name, "Node 1");
        assert_eq!(flow.nodes[1].name, "Webhook");
        assert_eq!(flow.nodes[2].name, "Node 3");
        assert_eq!(flow.nodes[2].type_version, 1);
        assert_eq!(flow.nodes[2].position, [0.0, 0.0]);
    }

    #[test]
    fn unnamed_nodes_get_distinct_fallback_names() {
        let flow = normalize(&json!({"nodes": [{}, {}, {}]}));
        let names: Vec<_> = flow.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Node 1", "Node 2", "Node 3"]);
    }

    #[test]
    fn partial_connection_targets_keep_their_wiring() {
        // LLM output and hand-pasted JSON often omit "type" or "index" on
        // targets; the rest of the map must survive with defaults filled in.
        let flow = normalize(&json!({
            "name": "F",
            "nodes": [{"name": "A"}, {"name": "B"}, {"name": "C"}],
            "connections": {
                "A": {"main": [[{"node": "C"}]]},
                "B": {"main": [[{"node": "C", "type": "main", "index": 1}]]}
            }
        }));
        assert_eq!(
            flow.connections["A"].main,
            vec![vec![ConnectionTarget::main("C")]]
        );
        assert_eq!(flow.connections["B"].main[0][0].index, 1);
    }

    #[test]
    fn only_unusable_connection_pieces_are_dropped() {
        let flow = normalize(&json!({
            "name": "F",
            "nodes": [{"name": "A"}, {"name": "B"}],
            "connections": {
                "A": {"main": [[{"node": "B"}, {"index": 0}], "junk"]},
                "B": {"other": []},
                "C": "junk"
            }
        }));
        // The nameless target and the non-array slot vanish, A's good
        // target stays; B has no "main" field so its entry is skipped.
        assert_eq!(
            flow.connections["A"].main,
            vec![vec![ConnectionTarget::main("B")]]
        );
        assert!(!flow.connections.contains_key("B"));
        assert!(!flow.connections.contains_key("C"));
    }

    #[test]
    fn well_typed_fields_pass_through() {
        let flow = normalize(&json!({
            "name": "Order intake",
            "active": true,
            "nodes": [{
                "id": "wh-1",
                "name": "Webhook",
                "type": "n8n-nodes-base.webhook",
                "typeVersion": 2,
                "position": [250.0, 300.0],
                "parameters": {"path": "/orders", "httpMethod": "POST"}
            }],
            "connections": {"Webhook": {"main": []}},
            "settings": {"timezone": "UTC"}
        }));
        assert_eq!(flow.name, "Order intake");
        assert!(flow.active);
        assert_eq!(flow.nodes[0].id, "wh-1");
        assert_eq!(flow.nodes[0].type_version, 2);
        assert_eq!(flow.nodes[0].position, [250.0, 300.0]);
        assert_eq!(flow.nodes[0].parameters["path"], "/orders");
        assert!(flow.connections.contains_key("Webhook"));
        assert_eq!(flow.settings, Some(json!({"timezone": "UTC"})));
    }

    #[test]
    fn normalization_is_idempotent_over_well_typed_input() {
        let raw = json!({
            "name": "F",
            "nodes": [{
                "id": "a", "name": "A", "type": "n8n-nodes-base.function",
                "typeVersion": 1, "position": [0.0, 0.0], "parameters": {}
            }],
            "connections": {},
            "active": false
        });
        let once = normalize(&raw);
        let twice = normalize(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }
}
