/// In-memory editing session registry using ArcSwap
///
/// Holds the current flow document per project id. Each commit swaps the
/// entire map pointer atomically, so reads never lock and a half-applied
/// edit is never observable. One logical writer edits a given project at a
/// time; the registry only makes the commit step explicit.

use crate::flow::types::Flow;
use arc_swap::ArcSwap;
use std::{collections::HashMap, sync::Arc};

/// Lock-free per-project flow session registry
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Atomic pointer to the project-id -> flow map
    sessions: ArcSwap<HashMap<String, Flow>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: ArcSwap::new(Arc::new(HashMap::new())),
        }
    }

    /// Read the current document for a project (lock-free)
    pub fn current(&self, project_id: &str) -> Option<Flow> {
        self.sessions.load().get(project_id).cloned()
    }

    /// Commit an edited document as the project's current state
    ///
    /// Clones the current map, replaces the entry, and swaps the pointer.
    pub fn commit(&self, project_id: &str, flow: Flow) {
        let current = self.sessions.load();
        let mut next = (**current).clone();
        next.insert(project_id.to_string(), flow);
        self.sessions.store(Arc::new(next));
        tracing::debug!("Committed flow for project: {}", project_id);
    }

    /// Drop a project's session state (project deleted)
    pub fn evict(&self, project_id: &str) {
        let current = self.sessions.load();
        if !current.contains_key(project_id) {
            return;
        }
        let mut next = (**current).clone();
        next.remove(project_id);
        self.sessions.store(Arc::new(next));
        tracing::debug!("Evicted session for project: {}", project_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::catalog::starter_flow;

    #[test]
    fn commit_then_current_round_trips() {
        let registry = SessionRegistry::new();
        assert!(registry.current("p1").is_none());

        let flow = starter_flow("P1");
        registry.commit("p1", flow.clone());
        assert_eq!(registry.current("p1"), Some(flow));
    }

    #[test]
    fn evict_removes_only_the_named_project() {
        let registry = SessionRegistry::new();
        registry.commit("p1", starter_flow("P1"));
        registry.commit("p2", starter_flow("P2"));

        registry.evict("p1");
        assert!(registry.current("p1").is_none());
        assert!(registry.current("p2").is_some());
    }
}
