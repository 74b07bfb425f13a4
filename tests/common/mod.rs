//! Toy protocols shared by the integration tests.

#![allow(dead_code)]

use protocheck::{hash_of, Message, Node, State, Timer};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tick;

impl Timer for Tick {
    fn remaining_time(&self) -> i64 {
        1
    }

    fn wait(&mut self, _t: i64) {}
}

/// A dial on a ring of `modulus` positions. Each tick turns it one step
/// either way, so the state graph is a cycle where every state branches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dial {
    pub value: u32,
    pub modulus: u32,
    tick: Tick,
}

impl Dial {
    pub fn new(modulus: u32) -> Self {
        Dial {
            value: 0,
            modulus,
            tick: Tick,
        }
    }

    fn turned(&self, value: u32) -> Box<dyn Node> {
        Box::new(Dial {
            value,
            ..self.clone()
        })
    }
}

impl Node for Dial {
    fn message_handler(&self, _message: &dyn Message) -> Vec<Box<dyn Node>> {
        vec![Box::new(self.clone())]
    }

    fn next_timer(&self) -> Option<&dyn Timer> {
        Some(&self.tick)
    }

    fn trigger_timer(&self) -> Vec<Box<dyn Node>> {
        vec![
            self.turned((self.value + 1) % self.modulus),
            self.turned((self.value + self.modulus - 1) % self.modulus),
        ]
    }

    fn handler_response(&mut self) -> Vec<Arc<dyn Message>> {
        Vec::new()
    }

    fn attribute(&self) -> &dyn Any {
        &self.value
    }

    fn hash_code(&self) -> u64 {
        hash_of("dial", self)
    }

    fn equals(&self, other: &dyn Node) -> bool {
        other.downcast_ref::<Dial>().is_some_and(|other| other == self)
    }
}

pub const DIAL: &str = "dial";

pub fn dial_model(modulus: u32) -> State {
    let mut state = State::new(0, false, false);
    state.add_node(DIAL, Dial::new(modulus), &[]);
    state
}

pub fn dial_value(state: &State) -> u32 {
    state
        .node(DIAL)
        .and_then(|node| node.attribute().downcast_ref::<u32>())
        .copied()
        .unwrap_or(u32::MAX)
}

pub fn dial_at(target: u32) -> impl Fn(&State) -> bool {
    move |state| dial_value(state) == target
}

pub fn always_valid(_: &State) -> bool {
    true
}
