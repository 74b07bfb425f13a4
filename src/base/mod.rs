//! State-space building blocks: the capability traits protocols implement,
//! the event taxonomy and the global [`State`] snapshot.

mod event;
mod hashing;
mod message;
mod node;
mod state;
mod timer;

pub use event::{Event, EventKind};
pub use hashing::hash_of;
pub use message::{Address, AsAny, Message, MessageHeader};
pub use node::{Client, Node, NodeClone, Outbox};
pub use state::State;
pub use timer::{Timer, TimerClone};
