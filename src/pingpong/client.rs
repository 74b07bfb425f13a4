use super::message::{PingCommand, PingMessage, PongMessage};
use super::timer::PingTimer;
use crate::base::{self, hash_of, Address, Message, Node, Outbox, State, Timer};
use std::any::Any;
use std::sync::Arc;

/// Pings the server with consecutive ids until `goal` is acknowledged.
///
/// With `retry` set the client owns a [`PingTimer`] and re-sends the next
/// unacknowledged ping whenever it fires.
#[derive(Debug, Clone)]
pub struct Client {
    address: Address,
    server: Address,
    ack: u32,
    goal: u32,
    retry: bool,
    ping_timer: Option<PingTimer>,
    outbox: Outbox,
}

impl Client {
    pub fn new(
        address: impl Into<Address>,
        server: impl Into<Address>,
        goal: u32,
        retry: bool,
    ) -> Self {
        Client {
            address: address.into(),
            server: server.into(),
            ack: 0,
            goal,
            retry,
            ping_timer: retry.then(PingTimer::new),
            outbox: Outbox::new(),
        }
    }

    /// Highest id acknowledged in sequence.
    pub fn ack(&self) -> u32 {
        self.ack
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    fn key(&self) -> (&Address, &Address, u32, u32, bool, i64) {
        let remain = self.ping_timer.as_ref().map_or(0, |t| t.remaining_time());
        (&self.address, &self.server, self.goal, self.ack, self.retry, remain)
    }

    fn successor(&self) -> Client {
        Client {
            outbox: Outbox::new(),
            ..self.clone()
        }
    }
}

impl Node for Client {
    fn message_handler(&self, message: &dyn Message) -> Vec<Box<dyn Node>> {
        let Some(pong) = message.downcast_ref::<PongMessage>() else {
            return vec![Box::new(self.clone())];
        };

        let mut next = self.successor();
        if pong.id == next.ack + 1 {
            next.ack = pong.id;
        }

        if pong.id != next.goal {
            next.outbox.set_single(PingMessage::new(
                self.address.clone(),
                pong.from().clone(),
                pong.id + 1,
            ));
        }

        vec![Box::new(next)]
    }

    fn next_timer(&self) -> Option<&dyn Timer> {
        if !self.retry {
            return None;
        }
        self.ping_timer.as_ref().map(|t| t as &dyn Timer)
    }

    fn trigger_timer(&self) -> Vec<Box<dyn Node>> {
        if !self.retry || self.ping_timer.is_none() {
            return Vec::new();
        }

        let mut next = self.successor();
        if next.ack == next.goal {
            next.ping_timer = None;
            return vec![Box::new(next)];
        }

        if let Some(timer) = next.ping_timer.as_mut() {
            timer.reset();
        }
        next.outbox
            .set_single(PingMessage::new(self.address.clone(), self.server.clone(), self.ack + 1));

        vec![Box::new(next)]
    }

    fn handler_response(&mut self) -> Vec<Arc<dyn Message>> {
        self.outbox.drain()
    }

    fn attribute(&self) -> &dyn Any {
        &self.ack
    }

    fn hash_code(&self) -> u64 {
        hash_of("client", &self.key())
    }

    fn equals(&self, other: &dyn Node) -> bool {
        other
            .downcast_ref::<Client>()
            .is_some_and(|other| {
                other.key() == self.key() && other.ping_timer.is_some() == self.ping_timer.is_some()
            })
    }
}

impl base::Client for Client {
    type Command = PingCommand;

    fn send_command(&self, state: &mut State, command: PingCommand) {
        let ping: Arc<dyn Message> =
            Arc::new(PingMessage::new(self.address.clone(), command.to, command.id));
        state.receive(vec![ping]);
    }
}
