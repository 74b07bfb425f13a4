use super::message::{PingMessage, PongMessage};
use crate::base::{hash_of, Message, Node, Outbox, Timer};
use std::any::Any;
use std::sync::Arc;

/// Server configuration and progress, exposed as the node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ServerAttribute {
    pub counter: u32,
    /// May handle a ping without answering.
    pub unstable: bool,
    /// May answer with the wrong id.
    pub crazy: bool,
}

/// Answers every ping with a pong carrying the same id.
#[derive(Debug, Clone, Default)]
pub struct Server {
    attribute: ServerAttribute,
    outbox: Outbox,
}

impl Server {
    pub fn new(unstable: bool, crazy: bool) -> Self {
        Server {
            attribute: ServerAttribute {
                counter: 0,
                unstable,
                crazy,
            },
            outbox: Outbox::new(),
        }
    }

    pub fn with_counter(counter: u32) -> Self {
        Server {
            attribute: ServerAttribute {
                counter,
                ..ServerAttribute::default()
            },
            outbox: Outbox::new(),
        }
    }

    pub fn counter(&self) -> u32 {
        self.attribute.counter
    }

    fn handled(&self) -> Server {
        let mut next = Server {
            attribute: self.attribute,
            outbox: Outbox::new(),
        };
        next.attribute.counter += 1;
        next
    }
}

impl Node for Server {
    fn message_handler(&self, message: &dyn Message) -> Vec<Box<dyn Node>> {
        let Some(ping) = message.downcast_ref::<PingMessage>() else {
            return vec![Box::new(self.clone())];
        };

        let mut alternatives: Vec<Box<dyn Node>> = Vec::with_capacity(3);

        let mut answered = self.handled();
        answered.outbox.set_single(PongMessage::reply(ping, ping.id));
        alternatives.push(Box::new(answered));

        if self.attribute.unstable {
            alternatives.push(Box::new(self.handled()));
        }

        if self.attribute.crazy {
            let mut wrong = self.handled();
            wrong.outbox.set_single(PongMessage::reply(ping, ping.id + 1));
            alternatives.push(Box::new(wrong));
        }

        alternatives
    }

    fn next_timer(&self) -> Option<&dyn Timer> {
        None
    }

    fn trigger_timer(&self) -> Vec<Box<dyn Node>> {
        Vec::new()
    }

    fn handler_response(&mut self) -> Vec<Arc<dyn Message>> {
        self.outbox.drain()
    }

    fn attribute(&self) -> &dyn Any {
        &self.attribute
    }

    fn hash_code(&self) -> u64 {
        hash_of("server", &self.attribute)
    }

    fn equals(&self, other: &dyn Node) -> bool {
        other
            .downcast_ref::<Server>()
            .is_some_and(|other| other.attribute == self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_equality() {
        let one = Server::with_counter(1);
        let two = Server::with_counter(2);
        assert!(!one.equals(&two));

        let other_one = Server::with_counter(1);
        assert_eq!(one.hash_code(), other_one.hash_code());
        assert!(one.equals(&other_one));
    }

    #[test]
    fn test_alternatives() {
        let ping = PingMessage::new("client", "server", 1);
        assert_eq!(Server::new(false, false).message_handler(&ping).len(), 1);
        assert_eq!(Server::new(true, false).message_handler(&ping).len(), 2);
        assert_eq!(Server::new(true, true).message_handler(&ping).len(), 3);
    }

    #[test]
    fn test_reply_is_drained_once() {
        let ping = PingMessage::new("client", "server", 4);
        let mut next = Server::new(false, false)
            .message_handler(&ping)
            .pop()
            .expect("one alternative");

        let replies = next.handler_response();
        assert_eq!(replies.len(), 1);
        let pong = replies[0].downcast_ref::<PongMessage>().expect("pong reply");
        assert_eq!(pong.id, 4);
        assert!(next.handler_response().is_empty());
    }

    #[test]
    fn test_non_ping_is_ignored() {
        let server = Server::with_counter(2);
        let pong = PongMessage::new("client", "server", 1);
        let next = server.message_handler(&pong);
        assert_eq!(next.len(), 1);
        assert!(next[0].equals(&server));
    }
}
