/// Structural flow validation
///
/// Checks a candidate flow document for field presence and connection
/// referential integrity. All checks run in one pass so every problem is
/// reported together; nothing is mutated and nothing short-circuits.

use crate::flow::types::Flow;
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of a validation pass
#[derive(Debug, Clone, serde::Serialize)]
pub struct Validation {
    /// True when `errors` is empty
    pub is_valid: bool,
    /// Every problem found, in check order
    pub errors: Vec<String>,
}

/// Validate an untrusted candidate document
///
/// The candidate may be missing fields or have wrong shapes entirely;
/// this reports the problems rather than failing. Referential integrity
/// walks every connection channel, not just "main", since the engine may
/// define other channels.
pub fn validate(candidate: &Value) -> Validation {
    let mut errors = Vec::new();

    let name_ok = candidate
        .get("name")
        .and_then(Value::as_str)
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    if !name_ok {
        errors.push("Missing required field: name".to_string());
    }

    let nodes = candidate.get("nodes").and_then(Value::as_array);
    if nodes.is_none() {
        errors.push("Missing required field: nodes".to_string());
    }
    if nodes.map(|n| n.is_empty()).unwrap_or(true) {
        errors.push("Flow must have at least one node".to_string());
    }

    let connections = candidate.get("connections").and_then(Value::as_object);
    if connections.is_none() {
        errors.push("Missing required field: connections".to_string());
    }

    // Referential integrity: every connection source and target must name
    // an existing node.
    let node_names: HashSet<&str> = nodes
        .map(|ns| {
            ns.iter()
                .filter_map(|n| n.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if let Some(connections) = connections {
        for (source, channels) in connections {
            if !node_names.contains(source.as_str()) {
                errors.push(format!("Connection references non-existent node: {source}"));
            }
            for target in connection_targets(channels) {
                if !node_names.contains(target) {
                    errors.push(format!(
                        "Connection references non-existent target node: {target}"
                    ));
                }
            }
        }
    }

    Validation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Validate a typed flow by serializing it back to its interchange shape
pub fn validate_flow(flow: &Flow) -> Validation {
    match serde_json::to_value(flow) {
        Ok(value) => validate(&value),
        Err(e) => Validation {
            is_valid: false,
            errors: vec![format!("Flow is not serializable: {e}")],
        },
    }
}

/// Target node names reachable under a source entry, across all channels
fn connection_targets(channels: &Value) -> Vec<&str> {
    let mut targets = Vec::new();
    if let Some(channels) = channels.as_object() {
        for slots in channels.values() {
            if let Some(slots) = slots.as_array() {
                for slot in slots {
                    if let Some(slot) = slot.as_array() {
                        for entry in slot {
                            if let Some(node) = entry.get("node").and_then(Value::as_str) {
                                targets.push(node);
                            }
                        }
                    }
                }
            }
        }
    }
    targets
}
