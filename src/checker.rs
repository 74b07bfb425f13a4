//! Configuration-driven entry point over the search strategies.

use crate::base::State;
use crate::config::{CheckerConfig, Strategy};
use crate::error::CheckerError;
use crate::rng::DeterministicRng;
use crate::search::{self, SearchResult};
use std::sync::Arc;
use tracing::info;

/// A validated search plan. Bounds are resolved here so that running a
/// plan cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    Bfs { limit: Option<usize> },
    BfsAll { depth: usize, workers: usize },
    RandomWalk { depth: usize },
    RandomWalkValidate { depth: usize },
    BatchRandomWalk { depth: usize, batch: usize },
    BatchRandomWalkValidate { depth: usize, batch: usize },
}

#[derive(Debug, Clone)]
pub struct Checker {
    config: CheckerConfig,
    plan: Plan,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Result<Self, CheckerError> {
        config.validate()?;

        let depth = config.max_depth.unwrap_or_default();
        let plan = match config.strategy {
            Strategy::Bfs => Plan::Bfs {
                limit: config.max_depth,
            },
            Strategy::BfsAll => Plan::BfsAll {
                depth,
                workers: config.workers,
            },
            Strategy::RandomWalk => Plan::RandomWalk { depth },
            Strategy::RandomWalkValidate => Plan::RandomWalkValidate { depth },
            Strategy::BatchRandomWalk => Plan::BatchRandomWalk {
                depth,
                batch: config.batch_size,
            },
            Strategy::BatchRandomWalkValidate => Plan::BatchRandomWalkValidate {
                depth,
                batch: config.batch_size,
            },
        };

        Ok(Checker { config, plan })
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run the configured search from `init`. Random strategies draw from a
    /// fresh generator seeded with the configured seed, so repeated runs
    /// agree.
    pub fn run<V, G>(&self, init: impl Into<Arc<State>>, validate: V, goal: G) -> SearchResult
    where
        V: Fn(&State) -> bool,
        G: Fn(&State) -> bool,
    {
        let mut rng = DeterministicRng::new(self.config.seed);
        info!(strategy = %self.config.strategy, seed = self.config.seed, "checker run");

        let result = match self.plan {
            Plan::Bfs { limit } => search::bfs_find(init, validate, goal, limit),
            Plan::BfsAll { depth, workers } if workers > 1 => {
                search::par_bfs_find_all(init, validate, goal, depth, workers)
            }
            Plan::BfsAll { depth, .. } => search::bfs_find_all(init, validate, goal, depth),
            Plan::RandomWalk { depth } => {
                search::random_walk_find(init, validate, goal, depth, &mut rng)
            }
            Plan::RandomWalkValidate { depth } => {
                search::random_walk_validate(init, validate, goal, depth, &mut rng)
            }
            Plan::BatchRandomWalk { depth, batch } => {
                search::batch_random_walk_find(init, validate, goal, depth, batch, &mut rng)
            }
            Plan::BatchRandomWalkValidate { depth, batch } => {
                search::batch_random_walk_validate(init, validate, goal, depth, batch, &mut rng)
            }
        };

        info!(strategy = %self.config.strategy, "{}", result.summary());
        result
    }
}
