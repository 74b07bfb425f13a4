use crate::base::{hash_of, Address, Message, MessageHeader};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PingMessage {
    header: MessageHeader,
    pub id: u32,
}

impl PingMessage {
    pub fn new(from: impl Into<Address>, to: impl Into<Address>, id: u32) -> Self {
        PingMessage {
            header: MessageHeader::new(from, to),
            id,
        }
    }
}

impl Message for PingMessage {
    fn from(&self) -> &Address {
        self.header.from()
    }

    fn to(&self) -> &Address {
        self.header.to()
    }

    fn hash_code(&self) -> u64 {
        hash_of("ping-message", self)
    }

    fn equals(&self, other: &dyn Message) -> bool {
        other
            .downcast_ref::<PingMessage>()
            .is_some_and(|other| other == self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PongMessage {
    header: MessageHeader,
    pub id: u32,
}

impl PongMessage {
    pub fn new(from: impl Into<Address>, to: impl Into<Address>, id: u32) -> Self {
        PongMessage {
            header: MessageHeader::new(from, to),
            id,
        }
    }

    /// Reply to `ping` carrying `id`.
    pub fn reply(ping: &PingMessage, id: u32) -> Self {
        PongMessage {
            header: ping.header.reversed(),
            id,
        }
    }
}

impl Message for PongMessage {
    fn from(&self) -> &Address {
        self.header.from()
    }

    fn to(&self) -> &Address {
        self.header.to()
    }

    fn hash_code(&self) -> u64 {
        hash_of("pong-message", self)
    }

    fn equals(&self, other: &dyn Message) -> bool {
        other
            .downcast_ref::<PongMessage>()
            .is_some_and(|other| other == self)
    }
}

/// Driver command: make the client ping `to` with `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingCommand {
    pub to: Address,
    pub id: u32,
}
