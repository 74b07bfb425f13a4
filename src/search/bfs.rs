use super::explored::ExploredSet;
use super::SearchResult;
use crate::base::State;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Breadth-first search for the first state satisfying `goal`.
///
/// The root itself is not validated. With `Some(limit)`, states at depth
/// `limit` are checked against `goal` but not expanded; `None` explores until
/// the reachable graph is exhausted.
pub fn bfs_find<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    limit: Option<usize>,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let init = init.into();
    info!(limit = ?limit, "bfs find started");

    let mut explored = ExploredSet::new();
    explored.insert(init.clone());
    let mut queue = VecDeque::from([init]);
    let mut dequeued = 0;

    while let Some(state) = queue.pop_front() {
        dequeued += 1;

        if goal(&state) {
            info!(explored = dequeued, depth = state.depth(), "bfs find reached goal");
            return SearchResult::found(state, dequeued);
        }

        if limit.is_some_and(|limit| state.depth() >= limit) {
            continue;
        }

        for next in state.next_states() {
            if explored.contains(&next) {
                continue;
            }
            if !validate(&next) {
                warn!(depth = next.depth(), event = %next.event(), "invalid state");
                return SearchResult::violated(next, dequeued);
            }
            explored.insert(next.clone());
            queue.push_back(next);
        }
    }

    info!(explored = dequeued, "bfs find exhausted");
    SearchResult {
        explored: dequeued,
        ..SearchResult::default()
    }
}

/// Breadth-first search up to `depth`, collecting every goal state.
///
/// Unlike [`bfs_find`] the root is validated too. `success` means no invalid
/// state was met within the bound.
pub fn bfs_find_all<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    depth: usize,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let init = init.into();
    info!(depth, "bfs find all started");

    if !validate(&init) {
        warn!("invalid root state");
        return SearchResult::violated(init, 0);
    }

    let mut explored = ExploredSet::new();
    explored.insert(init.clone());
    let mut queue = VecDeque::from([init]);
    let mut result = SearchResult::default();
    let mut level = 0;

    while let Some(state) = queue.pop_front() {
        result.explored += 1;

        if state.depth() != level {
            debug!(level = state.depth(), frontier = queue.len() + 1, "bfs level");
            level = state.depth();
        }

        if goal(&state) {
            result.targets.push(state.clone());
        }

        if state.depth() >= depth {
            continue;
        }

        for next in state.next_states() {
            if explored.contains(&next) {
                continue;
            }
            if !validate(&next) {
                warn!(depth = next.depth(), event = %next.event(), "invalid state");
                result.invalidate = Some(next);
                return result;
            }
            explored.insert(next.clone());
            queue.push_back(next);
        }
    }

    info!(
        explored = result.explored,
        targets = result.targets.len(),
        "bfs find all finished"
    );
    result.success = true;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pingpong::{self, Server};

    #[test]
    fn test_bfs_find_reaches_goal() {
        let root = pingpong::seeded_model(Server::new(false, false), 3);
        let result = bfs_find(root, pingpong::valid_ack_progress, pingpong::is_final, None);

        assert!(result.success);
        assert_eq!(result.targets.len(), 1);
        // ping, pong for each of three ids
        assert_eq!(result.targets[0].depth(), 6);
    }

    #[test]
    fn test_bfs_find_respects_limit() {
        let root = pingpong::seeded_model(Server::new(false, false), 3);
        let result = bfs_find(root, pingpong::valid_ack_progress, pingpong::is_final, Some(5));

        assert!(result.is_exhausted());
        assert_eq!(result.explored, 6);
    }

    #[test]
    fn test_bfs_find_all_reports_invalid_root() {
        let root = pingpong::seeded_model(Server::new(false, false), 3);
        let result = bfs_find_all(root, |_: &State| false, pingpong::is_final, 4);

        assert!(!result.success);
        assert!(result.invalidate.is_some_and(|s| s.depth() == 0));
        assert_eq!(result.explored, 0);
    }

    #[test]
    fn test_bfs_find_skips_root_validation() {
        let root = pingpong::seeded_model(Server::new(false, false), 3);
        let result = bfs_find(root, |s: &State| s.depth() == 0, |s: &State| s.depth() == 0, None);
        assert!(result.success);
        assert_eq!(result.explored, 1);
    }

    #[test]
    fn test_bfs_find_all_collects_goals() {
        let root = pingpong::model(false, false, Server::new(false, false), 2);
        let result = bfs_find_all(root, pingpong::valid_ack_progress, pingpong::is_final, 8);

        assert!(result.success, "{}", result.summary());
        assert!(!result.targets.is_empty());
        assert!(result.targets.iter().all(|s| pingpong::is_final(s)));
    }
}
