//! Counterexample and witness traces.

use crate::base::{Event, EventKind, State};
use crate::error::CheckerError;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;

/// One step of a path: `to` was derived from `from` through `event`.
#[derive(Debug, Clone)]
pub struct StateEdge {
    pub from: Arc<State>,
    pub event: Event,
    pub to: Arc<State>,
}

/// Walk the parent links of `target` back to its root.
///
/// Returns the root and the edges ordered from the root to `target`.
pub fn find_path(target: &Arc<State>) -> (Arc<State>, Vec<StateEdge>) {
    let mut edges = Vec::with_capacity(target.depth());
    let mut current = target.clone();

    while let Some(prev) = current.prev().cloned() {
        edges.push(StateEdge {
            from: prev.clone(),
            event: current.event().clone(),
            to: current,
        });
        current = prev;
    }

    edges.reverse();
    (current, edges)
}

pub fn format_path(path: &[StateEdge]) -> String {
    let mut out = String::new();
    for edge in path {
        let _ = writeln!(out, "Event: {}", edge.event);
    }
    out
}

pub fn print_path(path: &[StateEdge]) {
    print!("{}", format_path(path));
}

/// Serializable rendition of a path, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Depth of the state the step leads to.
    pub depth: usize,
    pub kind: EventKind,
    pub detail: String,
}

impl Trace {
    pub fn from_path(path: &[StateEdge]) -> Self {
        let steps = path
            .iter()
            .map(|edge| TraceStep {
                depth: edge.to.depth(),
                kind: edge.event.kind(),
                detail: edge.event.to_string(),
            })
            .collect();
        Trace { steps }
    }

    pub fn from_target(target: &Arc<State>) -> Self {
        let (_, path) = find_path(target);
        Self::from_path(&path)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn to_json(&self) -> Result<String, CheckerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pingpong::{self, Server};

    fn three_steps() -> Arc<State> {
        let mut state = Arc::new(pingpong::seeded_model(Server::new(false, false), 5));
        for _ in 0..3 {
            let next = state.next_states();
            state = next[0].clone();
        }
        state
    }

    #[test]
    fn test_find_path_orders_from_root() {
        let target = three_steps();
        let (root, path) = find_path(&target);

        assert_eq!(root.depth(), 0);
        assert!(root.prev().is_none());
        assert_eq!(path.len(), 3);
        assert!(Arc::ptr_eq(&path[0].from, &root));
        assert!(Arc::ptr_eq(&path[2].to, &target));
        for pair in path.windows(2) {
            assert!(Arc::ptr_eq(&pair[0].to, &pair[1].from));
        }
    }

    #[test]
    fn test_path_of_root_is_empty() {
        let root = Arc::new(State::new(0, false, false));
        let (found, path) = find_path(&root);
        assert!(path.is_empty());
        assert!(Arc::ptr_eq(&found, &root));
        assert_eq!(format_path(&path), "");
    }

    #[test]
    fn test_trace_json() {
        let trace = Trace::from_target(&three_steps());
        assert_eq!(trace.len(), 3);
        assert!(trace.steps.iter().all(|s| s.kind == EventKind::Handle));
        assert_eq!(trace.steps[2].depth, 3);

        let json = trace.to_json().unwrap();
        assert!(json.contains("\"handle\""));
        let back: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_format_path_labels_events() {
        let (_, path) = find_path(&three_steps());
        let text = format_path(&path);
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| {
            l.starts_with("Event: handle PingMessage") || l.starts_with("Event: handle PongMessage")
        }));
    }
}
