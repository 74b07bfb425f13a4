//! Explicit-state model checker for message-passing protocols.
//!
//! Protocols are modelled as [`Node`]s exchanging [`Message`]s. A [`State`]
//! snapshots every node and every in-flight message; its successors cover
//! delivery, duplicate delivery, loss, partitions and timer firings. The
//! [`search`] strategies walk that graph looking for goal states or
//! invariant violations, and [`find_path`] turns a hit into a trace.

pub mod base;
pub mod checker;
pub mod config;
pub mod error;
pub mod observability;
pub mod pingpong;
pub mod rng;
pub mod search;

pub use base::{
    hash_of, Address, Client, Event, EventKind, Message, MessageHeader, Node, Outbox, State, Timer,
};
pub use checker::Checker;
pub use config::{CheckerConfig, Strategy};
pub use error::CheckerError;
pub use rng::DeterministicRng;
pub use search::{
    batch_random_walk_find, batch_random_walk_validate, bfs_find, bfs_find_all, find_path,
    format_path, par_bfs_find_all, print_path, random_walk_find, random_walk_validate, SearchResult,
    StateEdge, Trace,
};
