use super::message::{AsAny, Message};
use super::timer::Timer;
use super::state::State;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An actor of the modelled distributed system.
///
/// A node stored in a [`State`] is never mutated. Every handler returns
/// brand-new nodes; returning several nodes models a decision the node could
/// take either way (e.g. a proposer that may keep waiting for more replies or
/// move on), and the checker explores each alternative.
///
/// Messages produced while handling an event are parked in the returned node
/// and collected through [`Node::handler_response`], which drains them.
pub trait Node: NodeClone + AsAny + fmt::Debug + Send + Sync {
    fn message_handler(&self, message: &dyn Message) -> Vec<Box<dyn Node>>;

    /// The next timer that will fire on this node, if any.
    fn next_timer(&self) -> Option<&dyn Timer>;

    /// Fire the pending timer and return the alternative successors.
    fn trigger_timer(&self) -> Vec<Box<dyn Node>>;

    /// Take the messages produced by the last handler, leaving none behind.
    fn handler_response(&mut self) -> Vec<Arc<dyn Message>>;

    /// Protocol-defined summary of the node, for predicates.
    fn attribute(&self) -> &dyn Any;

    fn hash_code(&self) -> u64;

    fn equals(&self, other: &dyn Node) -> bool;
}

/// Boxed copy of a node; provided for every `Node + Clone`.
pub trait NodeClone {
    fn clone_box(&self) -> Box<dyn Node>;
}

impl<T: Node + Clone + 'static> NodeClone for T {
    fn clone_box(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Node> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

impl dyn Node {
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn has_timer(&self) -> bool {
        self.next_timer().is_some()
    }
}

/// Outbound messages produced by a handler, waiting to be merged into the
/// network of the successor state.
///
/// Transient: it is excluded from node hashing and equality, and it is empty
/// for every node stored in a state.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pending: Vec<Arc<dyn Message>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Message) {
        self.pending.push(Arc::new(message));
    }

    pub fn set(&mut self, messages: Vec<Arc<dyn Message>>) {
        self.pending = messages;
    }

    pub fn set_single(&mut self, message: impl Message) {
        self.pending.clear();
        self.push(message);
    }

    pub fn drain(&mut self) -> Vec<Arc<dyn Message>> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Test-driver side of a protocol: turns a command into messages seeded into
/// a root state.
pub trait Client {
    type Command;

    fn send_command(&self, state: &mut State, command: Self::Command);
}
