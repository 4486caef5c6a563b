/// End-to-end intake pipeline tests
///
/// Exercises the normalize -> validate -> repair path the way the server
/// uses it: raw interchange JSON in, canonical connected flow out.

use flowpilot::flow::{self, validator, ConnectionTarget};
use serde_json::json;

#[test]
fn messy_import_comes_out_connected_and_valid() {
    // Three nodes, one unnamed, no wiring, junk typeVersion.
    let raw = json!({
        "nodes": [
            {"name": "Webhook", "type": "n8n-nodes-base.webhook"},
            {"type": "n8n-nodes-base.function", "typeVersion": "two"},
            {"name": "Send Email", "type": "n8n-nodes-base.emailSend"}
        ]
    });

    let flow = flow::intake(&raw);

    assert_eq!(flow.name, "Imported Flow");
    assert_eq!(flow.nodes[1].name, "Node 2");
    assert_eq!(flow.nodes[1].type_version, 1);

    // Linear chain: Webhook -> Node 2 -> Send Email, last node unwired.
    assert_eq!(
        flow.connections["Webhook"].main,
        vec![vec![ConnectionTarget::main("Node 2")]]
    );
    assert_eq!(
        flow.connections["Node 2"].main,
        vec![vec![ConnectionTarget::main("Send Email")]]
    );
    assert!(!flow.connections.contains_key("Send Email"));

    let result = validator::validate_flow(&flow);
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn intake_preserves_explicit_wiring() {
    let raw = json!({
        "name": "Branching",
        "nodes": [
            {"name": "A"}, {"name": "B"}, {"name": "C"}
        ],
        "connections": {
            "A": {"main": [[
                {"node": "B", "type": "main", "index": 0},
                {"node": "C", "type": "main", "index": 0}
            ]]}
        }
    });

    let flow = flow::intake(&raw);

    // A's fan-out entry survives verbatim; B still gets chained to C.
    let a_targets: Vec<_> = flow.connections["A"]
        .main
        .iter()
        .flatten()
        .map(|t| t.node.as_str())
        .collect();
    assert_eq!(a_targets, vec!["B", "C"]);
    assert_eq!(
        flow.connections["B"].main,
        vec![vec![ConnectionTarget::main("C")]]
    );
}

#[test]
fn partial_targets_do_not_cost_the_author_their_wiring() {
    // A skip connection whose target omits "type" and "index" must come
    // through intact; repair only chains the genuinely unwired node.
    let raw = json!({
        "nodes": [{"name": "A"}, {"name": "B"}, {"name": "C"}],
        "connections": {
            "A": {"main": [[{"node": "C"}]]}
        }
    });

    let flow = flow::intake(&raw);

    let a_targets: Vec<_> = flow.connections["A"]
        .main
        .iter()
        .flatten()
        .map(|t| t.node.as_str())
        .collect();
    assert_eq!(a_targets, vec!["C"]);
    assert_eq!(
        flow.connections["B"].main,
        vec![vec![ConnectionTarget::main("C")]]
    );
}

#[test]
fn intake_never_fails_on_garbage() {
    for raw in [
        json!({}),
        json!({"nodes": "not-an-array"}),
        json!({"name": 42, "nodes": [null, 17, "x"], "connections": []}),
        json!({"nodes": [{"position": "here"}], "connections": {"Ghost": {}}}),
    ] {
        let flow = flow::intake(&raw);
        for node in &flow.nodes {
            assert!(!node.id.is_empty());
            assert!(!node.name.is_empty());
        }
        // Dangling sources are filtered by the repair pass.
        for source in flow.connections.keys() {
            assert!(flow.node_by_name(source).is_some());
        }
    }
}

#[test]
fn interchange_round_trip_is_stable() {
    let raw = json!({
        "name": "Order intake",
        "active": true,
        "nodes": [{
            "id": "wh-1",
            "name": "Webhook",
            "type": "n8n-nodes-base.webhook",
            "typeVersion": 1,
            "position": [250.0, 300.0],
            "parameters": {"path": "/orders"}
        }],
        "connections": {},
        "settings": {"timezone": "UTC"}
    });

    let once = flow::intake(&raw);
    let again = flow::intake(&serde_json::to_value(&once).unwrap());
    assert_eq!(once, again);
}
