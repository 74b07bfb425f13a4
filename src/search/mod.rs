//! Search strategies over the state graph.
//!
//! Every strategy takes a root [`State`], a `validate` predicate that must
//! hold on every generated state, and a `goal` predicate. A failing
//! `validate` aborts the search and reports the offending state; its lineage
//! (see [`find_path`]) is the counterexample.

mod bfs;
mod explored;
mod parallel;
mod path;
mod walk;

pub use bfs::{bfs_find, bfs_find_all};
pub use explored::ExploredSet;
pub use parallel::par_bfs_find_all;
pub use path::{find_path, format_path, print_path, StateEdge, Trace, TraceStep};
pub use walk::{
    batch_random_walk_find, batch_random_walk_validate, random_walk_find, random_walk_validate,
};

use crate::base::State;
use std::sync::Arc;

/// Outcome of a search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Meaning depends on the strategy: a goal was found (`*_find`) or no
    /// invalid state was met (`*_find_all`, `*_validate`).
    pub success: bool,
    pub targets: Vec<Arc<State>>,
    /// First state that failed `validate`.
    pub invalidate: Option<Arc<State>>,
    /// States dequeued for BFS, trials for batched walks, steps for a
    /// validating walk.
    pub explored: usize,
}

impl SearchResult {
    pub fn is_violation(&self) -> bool {
        self.invalidate.is_some()
    }

    /// The search ended without a goal and without a violation.
    pub fn is_exhausted(&self) -> bool {
        !self.success && self.invalidate.is_none()
    }

    pub fn summary(&self) -> String {
        let outcome = if self.is_violation() {
            "violation"
        } else if self.success {
            "success"
        } else {
            "exhausted"
        };
        let depth = self
            .invalidate
            .as_ref()
            .or_else(|| self.targets.first())
            .map(|s| s.depth().to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{}: {} explored, {} targets, depth {}",
            outcome,
            self.explored,
            self.targets.len(),
            depth
        )
    }

    pub(crate) fn found(target: Arc<State>, explored: usize) -> Self {
        SearchResult {
            success: true,
            targets: vec![target],
            invalidate: None,
            explored,
        }
    }

    pub(crate) fn violated(state: Arc<State>, explored: usize) -> Self {
        SearchResult {
            success: false,
            targets: Vec::new(),
            invalidate: Some(state),
            explored,
        }
    }
}
