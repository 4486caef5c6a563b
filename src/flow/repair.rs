/// Connection repair
///
/// Post-normalization pass that wires freshly imported or AI-generated
/// flows into a connected linear pipeline. Valid existing connections are
/// preserved verbatim; nodes left unwired are chained to their positional
/// successor so a flow never arrives in the editing session as a pile of
/// disconnected nodes.

use crate::flow::types::{ConnectionTarget, Flow, NodeConnections};
use std::collections::BTreeMap;

/// Repair the connection map of a flow
///
/// Pure function over an owned flow. Entries whose source name does not
/// match any node are dropped; nodes without an outgoing entry get a
/// single "main" connection to the node after them, if one exists.
pub fn repair(mut flow: Flow) -> Flow {
    // Guarantee every node is connectable by name before wiring.
    for (i, node) in flow.nodes.iter_mut().enumerate() {
        if node.name.is_empty() {
            node.name = format!("Node {}", i + 1);
        }
    }

    let mut connections: BTreeMap<String, NodeConnections> = BTreeMap::new();

    // Carry forward valid existing entries untouched.
    for (source, channels) in &flow.connections {
        if flow.nodes.iter().any(|n| &n.name == source) {
            connections.insert(source.clone(), channels.clone());
        }
    }

    // Chain every still-unwired node to its successor.
    for i in 0..flow.nodes.len() {
        let source = flow.nodes[i].name.clone();
        if connections.contains_key(&source) {
            continue;
        }
        if let Some(next) = flow.nodes.get(i + 1) {
            connections.insert(
                source,
                NodeConnections {
                    main: vec![vec![ConnectionTarget::main(next.name.clone())]],
                },
            );
        }
    }

    flow.connections = connections;
    flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::normalizer::normalize;
    use serde_json::json;

    fn linear_flow(names: &[&str]) -> Flow {
        normalize(&json!({
            "name": "F",
            "nodes": names.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
            "connections": {}
        }))
    }

    #[test]
    fn unwired_nodes_are_chained_in_order() {
        let repaired = repair(linear_flow(&["A", "B", "C"]));
        assert_eq!(
            repaired.connections["A"].main,
            vec![vec![ConnectionTarget::main("B")]]
        );
        assert_eq!(
            repaired.connections["B"].main,
            vec![vec![ConnectionTarget::main("C")]]
        );
        // Last node has no successor and therefore no outgoing entry.
        assert!(!repaired.connections.contains_key("C"));
    }

    #[test]
    fn existing_valid_connections_survive_untouched() {
        let mut flow = linear_flow(&["A", "B", "C"]);
        flow.connections.insert(
            "A".to_string(),
            NodeConnections {
                main: vec![vec![ConnectionTarget::main("C")]],
            },
        );
        let repaired = repair(flow);
        // A keeps its explicit skip connection, B still gets chained.
        assert_eq!(
            repaired.connections["A"].main,
            vec![vec![ConnectionTarget::main("C")]]
        );
        assert_eq!(
            repaired.connections["B"].main,
            vec![vec![ConnectionTarget::main("C")]]
        );
    }

    #[test]
    fn dangling_source_entries_are_dropped() {
        let mut flow = linear_flow(&["A", "B"]);
        flow.connections.insert(
            "Ghost".to_string(),
            NodeConnections {
                main: vec![vec![ConnectionTarget::main("A")]],
            },
        );
        let repaired = repair(flow);
        assert!(!repaired.connections.contains_key("Ghost"));
    }

    #[test]
    fn single_node_flow_needs_no_wiring() {
        let repaired = repair(linear_flow(&["A"]));
        assert!(repaired.connections.is_empty());
    }
}
