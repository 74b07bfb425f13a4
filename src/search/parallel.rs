//! Level-synchronous BFS with frontier expansion spread over worker threads.
//!
//! Successor generation is a pure function of the parent, so each level's
//! frontier is split into contiguous chunks and expanded on scoped threads.
//! Deduplication, goal checks and validation then run on the calling thread
//! in frontier order, which keeps results identical to [`bfs_find_all`].
//!
//! [`bfs_find_all`]: super::bfs_find_all

use super::explored::ExploredSet;
use super::SearchResult;
use crate::base::State;
use std::panic;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parallel [`bfs_find_all`](super::bfs_find_all) with `workers` threads.
/// `workers <= 1` expands on the calling thread.
pub fn par_bfs_find_all<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    depth: usize,
    workers: usize,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let init = init.into();
    info!(depth, workers, "parallel bfs find all started");

    if !validate(&init) {
        warn!("invalid root state");
        return SearchResult::violated(init, 0);
    }

    let mut explored = ExploredSet::new();
    explored.insert(init.clone());
    let mut frontier = vec![init];
    let mut result = SearchResult::default();

    while !frontier.is_empty() {
        debug!(level = frontier[0].depth(), frontier = frontier.len(), "bfs level");

        let expandable = frontier[0].depth() < depth;
        let children = if expandable {
            expand(&frontier, workers)
        } else {
            vec![Vec::new(); frontier.len()]
        };

        let mut next_frontier = Vec::new();
        for (state, successors) in frontier.into_iter().zip(children) {
            result.explored += 1;

            if goal(&state) {
                result.targets.push(state);
            }

            for next in successors {
                if explored.contains(&next) {
                    continue;
                }
                if !validate(&next) {
                    warn!(depth = next.depth(), event = %next.event(), "invalid state");
                    result.invalidate = Some(next);
                    return result;
                }
                explored.insert(next.clone());
                next_frontier.push(next);
            }
        }
        frontier = next_frontier;
    }

    info!(
        explored = result.explored,
        targets = result.targets.len(),
        "parallel bfs find all finished"
    );
    result.success = true;
    result
}

/// Successors of every frontier state, in frontier order.
fn expand(frontier: &[Arc<State>], workers: usize) -> Vec<Vec<Arc<State>>> {
    if workers <= 1 || frontier.len() < 2 {
        return frontier.iter().map(|s| s.next_states()).collect();
    }

    let chunk_size = frontier.len().div_ceil(workers);
    let scoped = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = frontier
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move |_| chunk.iter().map(|s| s.next_states()).collect::<Vec<_>>())
            })
            .collect();

        let mut children = Vec::with_capacity(frontier.len());
        for handle in handles {
            match handle.join() {
                Ok(expanded) => children.extend(expanded),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        children
    });

    match scoped {
        Ok(children) => children,
        Err(payload) => panic::resume_unwind(payload),
    }
}
