//! Checker configuration.
//!
//! Loaded from TOML or from `PROTOCHECK_*` environment variables; every
//! field has a default, so a partial file is enough.

use crate::error::CheckerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Search strategy run by the [`Checker`](crate::Checker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Stop at the first goal state
    #[default]
    Bfs,
    /// Collect every goal state up to the depth bound
    BfsAll,
    RandomWalk,
    RandomWalkValidate,
    BatchRandomWalk,
    BatchRandomWalkValidate,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Bfs => "bfs",
            Strategy::BfsAll => "bfs_all",
            Strategy::RandomWalk => "random_walk",
            Strategy::RandomWalkValidate => "random_walk_validate",
            Strategy::BatchRandomWalk => "batch_random_walk",
            Strategy::BatchRandomWalkValidate => "batch_random_walk_validate",
        }
    }

    /// Whether the strategy is meaningless without a depth bound.
    pub fn requires_depth(&self) -> bool {
        !matches!(self, Strategy::Bfs)
    }

    pub fn is_batched(&self) -> bool {
        matches!(self, Strategy::BatchRandomWalk | Strategy::BatchRandomWalkValidate)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = CheckerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "bfs_all" => Ok(Strategy::BfsAll),
            "random_walk" => Ok(Strategy::RandomWalk),
            "random_walk_validate" => Ok(Strategy::RandomWalkValidate),
            "batch_random_walk" => Ok(Strategy::BatchRandomWalk),
            "batch_random_walk_validate" => Ok(Strategy::BatchRandomWalkValidate),
            other => Err(CheckerError::InvalidConfig(format!("unknown strategy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub strategy: Strategy,
    /// Depth bound. Only plain BFS may run without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Number of walks for the batched strategies
    pub batch_size: usize,
    /// Seed of the random walks
    pub seed: u64,
    /// Threads expanding the BFS frontier (`bfs_all` only)
    pub workers: usize,
    pub allow_drop_off: bool,
    pub allow_duplicate: bool,
    pub json_logs: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            strategy: Strategy::Bfs,
            max_depth: None,
            batch_size: 1000,
            seed: 42,
            workers: 1,
            allow_drop_off: false,
            allow_duplicate: false,
            json_logs: false,
        }
    }
}

impl CheckerConfig {
    /// Collect every goal state up to `depth`.
    pub fn exhaustive(depth: usize) -> Self {
        CheckerConfig {
            strategy: Strategy::BfsAll,
            max_depth: Some(depth),
            ..Self::default()
        }
    }

    /// Long random executions over an unreliable network.
    pub fn soak(seed: u64) -> Self {
        CheckerConfig {
            strategy: Strategy::BatchRandomWalkValidate,
            max_depth: Some(20),
            batch_size: 1000,
            seed,
            allow_drop_off: true,
            allow_duplicate: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CheckerError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CheckerError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| CheckerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, CheckerError> {
        Ok(toml::to_string(self)?)
    }

    /// Read `PROTOCHECK_*` environment variables, falling back to defaults
    /// for unset ones.
    pub fn from_env() -> Result<Self, CheckerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CheckerError> {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(default)
        };

        Ok(CheckerConfig {
            strategy: match lookup("PROTOCHECK_STRATEGY") {
                Some(s) => s.parse()?,
                None => defaults.strategy,
            },
            max_depth: parse_var(&lookup, "PROTOCHECK_MAX_DEPTH")?.or(defaults.max_depth),
            batch_size: parse_var(&lookup, "PROTOCHECK_BATCH_SIZE")?.unwrap_or(defaults.batch_size),
            seed: parse_var(&lookup, "PROTOCHECK_SEED")?.unwrap_or(defaults.seed),
            workers: parse_var(&lookup, "PROTOCHECK_WORKERS")?.unwrap_or(defaults.workers),
            allow_drop_off: flag("PROTOCHECK_ALLOW_DROP_OFF", defaults.allow_drop_off),
            allow_duplicate: flag("PROTOCHECK_ALLOW_DUPLICATE", defaults.allow_duplicate),
            json_logs: flag("PROTOCHECK_JSON_LOGS", defaults.json_logs),
        })
    }

    /// Reject combinations no search can run with.
    pub fn validate(&self) -> Result<(), CheckerError> {
        if self.strategy.requires_depth() && self.max_depth.is_none() {
            return Err(CheckerError::InvalidConfig(format!(
                "strategy '{}' requires max_depth",
                self.strategy
            )));
        }
        if self.strategy.is_batched() && self.batch_size == 0 {
            return Err(CheckerError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(CheckerError::InvalidConfig(
                "workers must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, CheckerError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CheckerError::InvalidConfig(format!("{}: cannot parse '{}'", key, raw))),
    }
}
