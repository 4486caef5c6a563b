/// Core flow type definitions
///
/// Defines the canonical in-memory representation of an n8n workflow:
/// named nodes with typed parameters and 2D canvas positions, plus a
/// connection map keyed by source node name. These types serialize
/// to/from the n8n interchange JSON format for persistence and deployment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A complete workflow document
///
/// Flows are held in memory by the editing session, persisted as a JSON
/// blob in the project store, and submitted verbatim to the n8n REST API
/// on deployment. Node insertion order is significant: the connection
/// repair pass infers a linear chain from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Human-assigned flow name, not guaranteed unique
    pub name: String,
    /// Ordered list of nodes in this flow
    pub nodes: Vec<FlowNode>,
    /// Connection map: source node name -> output slots -> targets
    pub connections: BTreeMap<String, NodeConnections>,
    /// Whether the flow should be activated on deployment
    #[serde(default)]
    pub active: bool,
    /// Optional flow description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional tags for grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Opaque engine settings, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

/// A single node in the flow
///
/// The `node_type` tag is an open-ended vocabulary of n8n node kinds
/// (webhook trigger, email send, function, ...). Unrecognized values are
/// legal and preserved verbatim; the core routes generically and never
/// interprets node semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Opaque stable identifier, generated on import if absent
    pub id: String,
    /// Display name, the reference key used by `connections`
    pub name: String,
    /// n8n node kind tag (e.g. "n8n-nodes-base.webhook")
    #[serde(rename = "type")]
    pub node_type: String,
    /// Node kind schema version
    #[serde(rename = "typeVersion", default = "default_type_version")]
    pub type_version: i64,
    /// Canvas position as [x, y]
    #[serde(default)]
    pub position: [f64; 2],
    /// Type-specific configuration, treated opaquely
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Opaque credential references, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,
}

/// Output slots of a single source node
///
/// n8n groups outgoing connections per channel; "main" is the only channel
/// this builder produces, but the model keeps the nesting so slot indexes
/// survive a round trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeConnections {
    /// Ordered output slots, each an ordered list of targets
    #[serde(default)]
    pub main: Vec<Vec<ConnectionTarget>>,
}

/// A single connection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    /// Referenced target node name
    pub node: String,
    /// Connection channel label ("main" observed, treated as opaque)
    #[serde(rename = "type")]
    pub channel: String,
    /// Input slot index on the target node
    pub index: u32,
}

fn default_type_version() -> i64 {
    1
}

impl Flow {
    /// Look up a node by its display name
    pub fn node_by_name(&self, name: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Look up a node by its stable id
    pub fn node_by_id(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All node display names in insertion order
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// Distinct node kind tags present in the flow
    pub fn node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for node in &self.nodes {
            if !types.contains(&node.node_type) {
                types.push(node.node_type.clone());
            }
        }
        types
    }
}

impl ConnectionTarget {
    /// Standard "main" channel target at input slot 0
    pub fn main(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            channel: "main".to_string(),
            index: 0,
        }
    }
}
