//! Random walks: one sampled execution at a time, for state spaces too
//! large to enumerate.

use super::SearchResult;
use crate::base::State;
use crate::rng::DeterministicRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Follow one random path until a goal, an invalid state, the depth bound
/// or a state without successors.
///
/// Every visited state is validated, the root included. `explored` counts
/// visited states.
pub fn random_walk_find<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    depth: usize,
    rng: &mut DeterministicRng,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let mut state = init.into();
    let mut visited = 0;

    while state.depth() <= depth {
        visited += 1;

        if !validate(&state) {
            return SearchResult::violated(state, visited);
        }
        if goal(&state) {
            return SearchResult::found(state, visited);
        }

        match state.random_next_state(rng) {
            Some(next) => state = next,
            None => break,
        }
    }

    SearchResult {
        explored: visited,
        ..SearchResult::default()
    }
}

/// Walk one random path to the depth bound, requiring every state on it to
/// be valid.
///
/// Goal hits do not stop the walk; the last one is kept in `targets`.
/// `explored` is the depth of the state the walk ended on.
pub fn random_walk_validate<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    depth: usize,
    rng: &mut DeterministicRng,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let mut state = init.into();
    let mut last_goal = None;

    while state.depth() <= depth {
        if !validate(&state) {
            let explored = state.depth();
            return SearchResult::violated(state, explored);
        }
        if goal(&state) {
            last_goal = Some(state.clone());
        }

        match state.random_next_state(rng) {
            Some(next) => state = next,
            None => break,
        }
    }

    SearchResult {
        success: true,
        targets: last_goal.into_iter().collect(),
        invalidate: None,
        explored: state.depth(),
    }
}

/// Up to `batch` independent [`random_walk_find`] trials; the first success
/// wins and reports its trial number in `explored`.
///
/// Trials that hit an invalid state do not stop the batch. If no trial
/// succeeds, the first invalid state met is reported.
pub fn batch_random_walk_find<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    depth: usize,
    batch: usize,
    rng: &mut DeterministicRng,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let init = init.into();
    info!(depth, batch, seed = rng.seed(), "batch random walk find started");

    let mut first_violation = None;
    for trial in 1..=batch {
        let mut result = random_walk_find(init.clone(), &validate, &goal, depth, rng);
        if result.success {
            info!(trial, "batch random walk find reached goal");
            result.explored = trial;
            return result;
        }
        if first_violation.is_none() {
            if let Some(state) = result.invalidate {
                warn!(trial, depth = state.depth(), "random walk met an invalid state");
                first_violation = Some(state);
            }
        }
    }

    debug!(batch, "batch random walk find exhausted");
    SearchResult {
        success: false,
        targets: Vec::new(),
        invalidate: first_violation,
        explored: batch,
    }
}

/// Up to `batch` [`random_walk_validate`] trials, failing fast on the first
/// invalid one. Goal states of all trials are aggregated and `explored` is
/// the sum over trials.
pub fn batch_random_walk_validate<V, G>(
    init: impl Into<Arc<State>>,
    validate: V,
    goal: G,
    depth: usize,
    batch: usize,
    rng: &mut DeterministicRng,
) -> SearchResult
where
    V: Fn(&State) -> bool,
    G: Fn(&State) -> bool,
{
    let init = init.into();
    info!(depth, batch, seed = rng.seed(), "batch random walk validate started");

    let mut aggregate = SearchResult::default();
    for trial in 1..=batch {
        let result = random_walk_validate(init.clone(), &validate, &goal, depth, rng);
        if !result.success {
            warn!(trial, explored = result.explored, "random walk met an invalid state");
            return result;
        }
        aggregate.targets.extend(result.targets);
        aggregate.explored += result.explored;
    }

    info!(
        explored = aggregate.explored,
        targets = aggregate.targets.len(),
        "batch random walk validate finished"
    );
    aggregate.success = true;
    aggregate
}
