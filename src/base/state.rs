//! Global snapshot of the modelled system and its successor function.
//!
//! A [`State`] holds every node and every in-flight message. It is built once
//! as a root (nodes registered, initial messages sent) and afterwards only
//! derived: [`State::next_states`] enumerates every state reachable through
//! one atomic event, [`State::random_next_state`] samples one of them.
//!
//! ```text
//!   root ──handle(ping)──► s1 ──trigger(client)──► s2
//!     │
//!     ├──drop off(ping)──► s1'
//!     └──handle duplicate(ping)──► s1''
//! ```
//!
//! Equality ignores the order of the network: two states holding the same
//! messages in different orders are equal. The network is sorted by message
//! hash lazily, the first time an equality check needs it.

use super::event::{Event, EventKind};
use super::hashing::{combine, hash_sort};
use super::message::{Address, Message};
use super::node::Node;
use crate::rng::DeterministicRng;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Registration data. Constant once the root is built, so a whole lineage
/// shares one copy.
#[derive(Debug, Clone, Default)]
struct Topology {
    addresses: Vec<Address>,
    block_lists: HashMap<Address, HashSet<Address>>,
}

impl Topology {
    fn is_blocked(&self, to: &Address, from: &Address) -> bool {
        self.block_lists
            .get(to)
            .is_some_and(|blocked| blocked.contains(from))
    }
}

#[derive(Debug, Clone, Default)]
struct Network {
    messages: Vec<Arc<dyn Message>>,
    hash_sorted: bool,
}

pub struct State {
    nodes: HashMap<Address, Arc<dyn Node>>,
    topology: Arc<Topology>,
    network: RwLock<Network>,
    depth: usize,

    allow_drop_off: bool,
    allow_duplicate: bool,

    prev: Option<Arc<State>>,
    event: Event,

    // Wrapping sums of the component hashes, maintained on every change.
    node_hash: u64,
    network_hash: u64,
}

impl State {
    pub fn new(depth: usize, allow_drop_off: bool, allow_duplicate: bool) -> Self {
        State {
            nodes: HashMap::new(),
            topology: Arc::new(Topology::default()),
            network: RwLock::new(Network {
                messages: Vec::with_capacity(8),
                hash_sorted: false,
            }),
            depth,
            allow_drop_off,
            allow_duplicate,
            prev: None,
            event: Event::Empty,
            node_hash: 0,
            network_hash: 0,
        }
    }

    /// Register `node` under `address`. Senders listed in `block_list` can
    /// never reach this address. Messages the node already queued are sent.
    ///
    /// Registration belongs to the root: every state derived afterwards
    /// shares the address list and block lists.
    pub fn add_node(
        &mut self,
        address: impl Into<Address>,
        node: impl Node,
        block_list: &[Address],
    ) {
        self.add_boxed_node(address.into(), Box::new(node), block_list);
    }

    pub fn add_boxed_node(
        &mut self,
        address: Address,
        mut node: Box<dyn Node>,
        block_list: &[Address],
    ) {
        let responses = node.handler_response();
        let node: Arc<dyn Node> = Arc::from(node);
        self.node_hash = self.node_hash.wrapping_add(node.hash_code());

        let topology = Arc::make_mut(&mut self.topology);
        match self.nodes.insert(address.clone(), node) {
            Some(old) => self.node_hash = self.node_hash.wrapping_sub(old.hash_code()),
            None => topology.addresses.push(address.clone()),
        }
        topology
            .block_lists
            .insert(address, block_list.iter().cloned().collect());

        self.receive(responses);
    }

    /// Replace the node at `address` with `node`, merging the messages it
    /// produced into the network.
    ///
    /// Only registered addresses can be updated; anything else is ignored,
    /// since registration is fixed once the root is built.
    pub fn update_node(&mut self, address: &Address, mut node: Box<dyn Node>) {
        let Some(slot) = self.nodes.get_mut(address) else {
            warn!(%address, "update of unregistered address ignored");
            return;
        };

        let responses = node.handler_response();
        let node: Arc<dyn Node> = Arc::from(node);
        self.node_hash = self
            .node_hash
            .wrapping_sub(slot.hash_code())
            .wrapping_add(node.hash_code());
        *slot = node;

        self.receive(responses);
    }

    /// Put a message in flight.
    pub fn send(&mut self, message: impl Message) {
        self.receive(vec![Arc::new(message)]);
    }

    pub fn receive(&mut self, messages: Vec<Arc<dyn Message>>) {
        if messages.is_empty() {
            return;
        }

        let network = self.network.get_mut();
        for message in messages {
            self.network_hash = self.network_hash.wrapping_add(message.hash_code());
            network.messages.push(message);
        }
        network.hash_sorted = false;
    }

    /// Remove the message at `index`. The last message takes its slot.
    pub fn delete_message(&mut self, index: usize) -> Arc<dyn Message> {
        let network = self.network.get_mut();
        let message = network.messages.swap_remove(index);
        network.hash_sorted = false;
        self.network_hash = self.network_hash.wrapping_sub(message.hash_code());
        message
    }

    pub fn nodes(&self) -> &HashMap<Address, Arc<dyn Node>> {
        &self.nodes
    }

    pub fn node(&self, address: &str) -> Option<&dyn Node> {
        self.nodes.get(address).map(|node| &**node)
    }

    /// The node at `address`, downcast to its concrete type.
    pub fn node_as<T: Node>(&self, address: &str) -> Option<&T> {
        self.nodes.get(address)?.downcast_ref::<T>()
    }

    /// Registered addresses, in registration order.
    pub fn addresses(&self) -> &[Address] {
        &self.topology.addresses
    }

    pub fn block_list(&self, address: &str) -> Option<&HashSet<Address>> {
        self.topology.block_lists.get(address)
    }

    pub fn network(&self) -> MappedRwLockReadGuard<'_, [Arc<dyn Message>]> {
        RwLockReadGuard::map(self.network.read(), |network| network.messages.as_slice())
    }

    pub fn network_len(&self) -> usize {
        self.network.read().messages.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn allows_drop_off(&self) -> bool {
        self.allow_drop_off
    }

    pub fn allows_duplicate(&self) -> bool {
        self.allow_duplicate
    }

    pub fn prev(&self) -> Option<&Arc<State>> {
        self.prev.as_ref()
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn node_hash(&self) -> u64 {
        self.node_hash
    }

    pub fn network_hash(&self) -> u64 {
        self.network_hash
    }

    /// Hash of the whole snapshot. Block lists are not part of it: they never
    /// change within a lineage.
    pub fn hash_code(&self) -> u64 {
        combine(self.node_hash, self.network_hash)
    }

    pub fn is_hash_sorted(&self) -> bool {
        self.network.read().hash_sorted
    }

    /// Sort the network by message hash. No-op once sorted.
    pub fn hash_sort(&self) {
        if self.network.read().hash_sorted {
            return;
        }

        let mut network = self.network.write();
        if !network.hash_sorted {
            hash_sort(&mut network.messages);
            network.hash_sorted = true;
        }
    }

    /// Structural equality; block lists are not compared.
    pub fn equals(&self, other: &State) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        if self.nodes.len() != other.nodes.len()
            || self.node_hash != other.node_hash
            || self.network_hash != other.network_hash
            || self.network_len() != other.network_len()
        {
            return false;
        }

        for (address, node) in &self.nodes {
            match other.nodes.get(address) {
                Some(other_node) if node.equals(&**other_node) => {}
                _ => return false,
            }
        }

        self.hash_sort();
        other.hash_sort();

        let mine = self.network.read();
        let theirs = other.network.read();
        mine.messages
            .iter()
            .zip(theirs.messages.iter())
            .all(|(a, b)| a.equals(&**b))
    }

    /// Copy of this state one level deeper, without lineage. Nodes are
    /// shared, the network is copied.
    pub fn fork(&self) -> State {
        let network = self.network.read().clone();
        self.fork_with(network)
    }

    /// Child of this state reached through `event`.
    pub fn inherit(self: &Arc<Self>, event: Event) -> State {
        let network = self.network.read().clone();
        self.derive(event, &network)
    }

    fn fork_with(&self, network: Network) -> State {
        State {
            nodes: self.nodes.clone(),
            topology: Arc::clone(&self.topology),
            network: RwLock::new(network),
            depth: self.depth + 1,
            allow_drop_off: self.allow_drop_off,
            allow_duplicate: self.allow_duplicate,
            prev: None,
            event: Event::Empty,
            node_hash: self.node_hash,
            network_hash: self.network_hash,
        }
    }

    // Children are built from one snapshot of the parent network, so message
    // indices stay valid even if the parent gets hash-sorted meanwhile.
    fn derive(self: &Arc<Self>, event: Event, network: &Network) -> State {
        let mut child = self.fork_with(network.clone());
        child.prev = Some(Arc::clone(self));
        child.event = event;
        child
    }

    fn deliverable_locally(&self, message: &dyn Message) -> bool {
        message.is_local() && self.nodes.contains_key(message.to())
    }

    /// The successor for a message that cannot reach its destination, or
    /// `None` when it can.
    fn unreachable_successor(
        self: &Arc<Self>,
        network: &Network,
        index: usize,
    ) -> Option<Arc<State>> {
        let message = &network.messages[index];
        let to = message.to();

        let event = if !self.nodes.contains_key(to) {
            Event::UnknownDestination(Arc::clone(message))
        } else if self.topology.is_blocked(to, message.from()) {
            Event::Partition(Arc::clone(message))
        } else {
            return None;
        };

        let mut child = self.derive(event, network);
        child.delete_message(index);
        Some(Arc::new(child))
    }

    fn drop_message(self: &Arc<Self>, network: &Network, index: usize) -> Arc<State> {
        let event = Event::DropOff(Arc::clone(&network.messages[index]));
        let mut child = self.derive(event, network);
        child.delete_message(index);
        Arc::new(child)
    }

    /// Deliver the message at `index`. With `delete` unset the message stays
    /// in flight and may be delivered again.
    fn handle_message(
        self: &Arc<Self>,
        network: &Network,
        index: usize,
        delete: bool,
    ) -> Vec<Arc<State>> {
        let message = &network.messages[index];
        let to = message.to();
        let Some(node) = self.nodes.get(to) else {
            return Vec::new();
        };

        let event = if delete {
            Event::Handle(Arc::clone(message))
        } else {
            Event::HandleDuplicate(Arc::clone(message))
        };

        node.message_handler(&**message)
            .into_iter()
            .map(|alternative| {
                let mut child = self.derive(event.clone(), network);
                if delete {
                    child.delete_message(index);
                }
                child.update_node(to, alternative);
                Arc::new(child)
            })
            .collect()
    }

    fn trigger_node_timer(
        self: &Arc<Self>,
        network: &Network,
        address: &Address,
    ) -> Vec<Arc<State>> {
        let Some(node) = self.nodes.get(address) else {
            return Vec::new();
        };
        let Some(timer) = node.next_timer() else {
            return Vec::new();
        };

        let event = Event::trigger(address.clone(), timer);
        node.trigger_timer()
            .into_iter()
            .map(|alternative| {
                let mut child = self.derive(event.clone(), network);
                child.update_node(address, alternative);
                Arc::new(child)
            })
            .collect()
    }

    /// Every state reachable through one event.
    ///
    /// Output order is deterministic for a given state but carries no
    /// meaning.
    pub fn next_states(self: &Arc<Self>) -> Vec<Arc<State>> {
        let network = self.network.read().clone();
        let mut next = Vec::with_capacity(network.messages.len() * 2 + 1);

        for (index, message) in network.messages.iter().enumerate() {
            if self.deliverable_locally(&**message) {
                next.extend(self.handle_message(&network, index, true));
                continue;
            }

            if let Some(child) = self.unreachable_successor(&network, index) {
                next.push(child);
                continue;
            }

            if self.allow_drop_off {
                next.push(self.drop_message(&network, index));
            }

            next.extend(self.handle_message(&network, index, true));

            if self.allow_duplicate {
                next.extend(self.handle_message(&network, index, false));
            }
        }

        // Registration order, not map order, keeps the output deterministic.
        for address in &self.topology.addresses {
            next.extend(self.trigger_node_timer(&network, address));
        }

        next
    }

    /// One successor chosen at random.
    ///
    /// Every in-flight message and every timer-bearing node is equally
    /// likely to be picked, whatever the number of outcomes behind it. For a
    /// reachable message the enabled outcomes among drop, delivery and
    /// duplicate delivery are equally likely. Returns `None` when nothing can
    /// happen or the chosen event has no outcome.
    pub fn random_next_state(self: &Arc<Self>, rng: &mut DeterministicRng) -> Option<Arc<State>> {
        let network = self.network.read().clone();
        let timer_addresses: Vec<&Address> = self
            .topology
            .addresses
            .iter()
            .filter(|address| {
                self.nodes
                    .get(*address)
                    .is_some_and(|node| node.has_timer())
            })
            .collect();

        let total = network.messages.len() + timer_addresses.len();
        if total == 0 {
            return None;
        }

        let roll = rng.gen_index(total);
        if roll >= network.messages.len() {
            let address = timer_addresses[roll - network.messages.len()];
            return pick(rng, self.trigger_node_timer(&network, address));
        }

        if self.deliverable_locally(&*network.messages[roll]) {
            return pick(rng, self.handle_message(&network, roll, true));
        }

        if let Some(child) = self.unreachable_successor(&network, roll) {
            return Some(child);
        }

        let mut outcomes = Vec::with_capacity(3);
        if self.allow_drop_off {
            outcomes.push(EventKind::DropOff);
        }
        outcomes.push(EventKind::Handle);
        if self.allow_duplicate {
            outcomes.push(EventKind::HandleDuplicate);
        }

        match outcomes[rng.gen_index(outcomes.len())] {
            EventKind::DropOff => Some(self.drop_message(&network, roll)),
            EventKind::HandleDuplicate => pick(rng, self.handle_message(&network, roll, false)),
            _ => pick(rng, self.handle_message(&network, roll, true)),
        }
    }
}

fn pick(rng: &mut DeterministicRng, mut states: Vec<Arc<State>>) -> Option<Arc<State>> {
    match states.len() {
        0 | 1 => states.pop(),
        n => Some(states.swap_remove(rng.gen_index(n))),
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for State {}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: BTreeMap<&Address, &Arc<dyn Node>> = self.nodes.iter().collect();
        let network = self.network.read();
        f.debug_struct("State")
            .field("depth", &self.depth)
            .field("event", &self.event.kind())
            .field("nodes", &nodes)
            .field("network", &network.messages)
            .finish()
    }
}

// A long random walk builds a long parent chain; unlink it iteratively so
// dropping the last state does not recurse once per ancestor.
impl Drop for State {
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(parent) = prev {
            match Arc::try_unwrap(parent) {
                Ok(mut state) => prev = state.prev.take(),
                Err(_) => break,
            }
        }
    }
}
