/// Flow document layer
///
/// The canonical workflow model and the pipeline that turns arbitrary,
/// possibly malformed input into a usable document:
/// normalize -> validate -> repair -> commit to the editing session.

// Canonical flow, node, and connection types
pub mod types;

// Structural integrity checks (field presence, dangling connections)
pub mod validator;

// Untrusted JSON -> canonical flow coercion
pub mod normalizer;

// Linear-chain wiring for unconnected nodes
pub mod repair;

// Pure editing operations applied by the session
pub mod editor;

// Node kind side-table and flow templates
pub mod catalog;

// Lock-free per-project session state
pub mod session;

// Re-export commonly used types
pub use types::{ConnectionTarget, Flow, FlowNode, NodeConnections};
pub use validator::{validate, validate_flow, Validation};

/// Run the full intake pipeline on untrusted flow JSON
///
/// Normalizes and repairs in one step. Validation is intentionally left to
/// the caller: an editing session accepts structurally incomplete flows,
/// deployment does not.
pub fn intake(raw: &serde_json::Value) -> Flow {
    repair::repair(normalizer::normalize(raw))
}
