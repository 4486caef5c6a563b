/// Flow editing operations
///
/// Pure transformations applied to an exclusively-owned flow by the
/// editing session. Each operation mutates the passed document and leaves
/// committing the result to the session registry to the caller; there is
/// no ambient shared workflow state.

use crate::flow::types::{ConnectionTarget, Flow, FlowNode, NodeConnections};
use chrono::Utc;
use uuid::Uuid;

/// Add a node, assigning a fresh collision-resistant id
///
/// The id combines a wall-clock component with a random component so ids
/// stay unique and stable across edits of the same node.
pub fn add_node(flow: &mut Flow, mut node: FlowNode) {
    if node.id.is_empty() {
        node.id = generate_node_id();
    }
    flow.nodes.push(node);
}

/// Apply a closure to the node with the given id, if present
pub fn update_node<F>(flow: &mut Flow, node_id: &str, update: F) -> bool
where
    F: FnOnce(&mut FlowNode),
{
    match flow.nodes.iter_mut().find(|n| n.id == node_id) {
        Some(node) => {
            update(node);
            true
        }
        None => false,
    }
}

/// Remove a node and every connection to or from it
pub fn remove_node(flow: &mut Flow, node_id: &str) -> bool {
    let Some(pos) = flow.nodes.iter().position(|n| n.id == node_id) else {
        return false;
    };
    let name = flow.nodes[pos].name.clone();
    flow.nodes.remove(pos);

    flow.connections.remove(&name);
    for channels in flow.connections.values_mut() {
        prune_target(channels, &name);
    }
    true
}

/// Append a "main" connection from one named node to another
pub fn add_connection(flow: &mut Flow, from: &str, to: &str) {
    flow.connections
        .entry(from.to_string())
        .or_default()
        .main
        .push(vec![ConnectionTarget::main(to)]);
}

/// Remove every connection from `from` to `to`, dropping emptied slots
pub fn remove_connection(flow: &mut Flow, from: &str, to: &str) {
    if let Some(channels) = flow.connections.get_mut(from) {
        prune_target(channels, to);
        if channels.main.is_empty() {
            flow.connections.remove(from);
        }
    }
}

/// Rename the flow itself
pub fn rename(flow: &mut Flow, name: impl Into<String>) {
    flow.name = name.into();
}

/// Serialize the flow in the pretty interchange format used for export
pub fn export_json(flow: &Flow) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(flow)?)
}

fn prune_target(channels: &mut NodeConnections, target: &str) {
    for slot in channels.main.iter_mut() {
        slot.retain(|t| t.node != target);
    }
    channels.main.retain(|slot| !slot.is_empty());
}

fn generate_node_id() -> String {
    format!(
        "node-{}-{}",
        Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..9]
    )
}
