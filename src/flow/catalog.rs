/// Node kind catalog and flow templates
///
/// Node types are an open-ended vocabulary owned by the execution engine,
/// so the model treats them as opaque strings and this side-table supplies
/// presentation metadata for the kinds we know about. Unknown kinds get a
/// generic entry; adding a kind never requires touching the core model.

use crate::flow::types::{Flow, FlowNode};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Presentation metadata for a node kind
#[derive(Debug, Clone, serde::Serialize)]
pub struct NodeKindInfo {
    /// Short display label
    pub label: &'static str,
    /// Coarse grouping used by the canvas UI
    pub category: &'static str,
}

const GENERIC_KIND: NodeKindInfo = NodeKindInfo {
    label: "Node",
    category: "generic",
};

/// Look up presentation metadata for a node kind tag
///
/// Total lookup: unrecognized tags return a generic entry rather than an
/// error, since the engine defines kinds we have never seen.
pub fn kind_info(node_type: &str) -> NodeKindInfo {
    match node_type {
        "n8n-nodes-base.webhook" => NodeKindInfo {
            label: "Webhook",
            category: "trigger",
        },
        "n8n-nodes-base.emailSend" => NodeKindInfo {
            label: "Send Email",
            category: "action",
        },
        "n8n-nodes-base.function" => NodeKindInfo {
            label: "Function",
            category: "transform",
        },
        "n8n-nodes-base.httpRequest" => NodeKindInfo {
            label: "HTTP Request",
            category: "action",
        },
        "n8n-nodes-base.noOp" => NodeKindInfo {
            label: "No Operation",
            category: "generic",
        },
        _ => GENERIC_KIND,
    }
}

/// Build a webhook trigger node
pub fn webhook_node(name: &str, path: &str, method: &str) -> FlowNode {
    node(
        name,
        "n8n-nodes-base.webhook",
        [250.0, 300.0],
        [
            ("httpMethod", json!(method)),
            ("path", json!(path)),
            ("responseMode", json!("onReceived")),
        ],
    )
}

/// Build an outbound-email action node
pub fn email_node(name: &str, from: &str, to: &str, subject: &str, text: &str) -> FlowNode {
    node(
        name,
        "n8n-nodes-base.emailSend",
        [500.0, 300.0],
        [
            ("fromEmail", json!(from)),
            ("toEmail", json!(to)),
            ("subject", json!(subject)),
            ("text", json!(text)),
        ],
    )
}

/// Build a function node with inline code
pub fn function_node(name: &str, code: &str) -> FlowNode {
    node(
        name,
        "n8n-nodes-base.function",
        [400.0, 300.0],
        [("functionCode", json!(code))],
    )
}

/// Starter flow used when a project has no saved document yet
pub fn starter_flow(name: &str) -> Flow {
    Flow {
        name: name.to_string(),
        nodes: vec![webhook_node("Webhook", "/incoming", "POST")],
        connections: BTreeMap::new(),
        active: false,
        description: None,
        tags: None,
        settings: None,
    }
}

fn node<const N: usize>(
    name: &str,
    node_type: &str,
    position: [f64; 2],
    parameters: [(&str, Value); N],
) -> FlowNode {
    let mut params = Map::new();
    for (key, value) in parameters {
        params.insert(key.to_string(), value);
    }
    FlowNode {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        node_type: node_type.to_string(),
        type_version: 1,
        position,
        parameters: params,
        credentials: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kinds_fall_back_to_generic_info() {
        let info = kind_info("n8n-nodes-base.someFutureNode");
        assert_eq!(info.category, "generic");
    }

    #[test]
    fn starter_flow_is_valid() {
        let flow = starter_flow("New Project");
        let result = crate::flow::validator::validate_flow(&flow);
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn webhook_node_carries_routing_parameters() {
        let node = webhook_node("Webhook", "/orders", "POST");
        assert_eq!(node.parameters["path"], "/orders");
        assert_eq!(node.parameters["httpMethod"], "POST");
        assert_eq!(kind_info(&node.node_type).category, "trigger");
    }
}
