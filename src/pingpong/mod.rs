//! Ping-pong reference protocol.
//!
//! A client pings a server with consecutive ids and counts the in-order
//! pongs. The server can be configured to misbehave (`unstable` swallows
//! replies, `crazy` answers with the wrong id), which makes the model a
//! compact fixture for exercising the search strategies.

mod client;
mod message;
mod server;
mod timer;

pub use client::Client;
pub use message::{PingCommand, PingMessage, PongMessage};
pub use server::{Server, ServerAttribute};
pub use timer::{PingTimer, RETRY_TIME};

use crate::base::{Address, Client as _, EventKind, State};

pub const CLIENT: &str = "client";
pub const SERVER: &str = "server";

/// Root state with one retrying client that wants `goal` pongs and the given
/// server. The first ping is left to the client's timer.
pub fn model(allow_drop_off: bool, allow_duplicate: bool, server: Server, goal: u32) -> State {
    let mut state = State::new(0, allow_drop_off, allow_duplicate);
    state.add_node(SERVER, server, &[]);
    state.add_node(CLIENT, Client::new(CLIENT, SERVER, goal, true), &[]);
    state
}

/// Root state where the client sends the first ping up front and never
/// retries.
pub fn seeded_model(server: Server, goal: u32) -> State {
    let mut state = State::new(0, false, false);
    state.add_node(SERVER, server, &[]);
    let client = Client::new(CLIENT, SERVER, goal, false);
    client.send_command(
        &mut state,
        PingCommand {
            to: Address::from(SERVER),
            id: 1,
        },
    );
    state.add_node(CLIENT, client, &[]);
    state
}

/// The client has acknowledged its goal.
pub fn is_final(state: &State) -> bool {
    state
        .node_as::<Client>(CLIENT)
        .is_some_and(|client| client.ack() == client.goal())
}

/// The acknowledged id only moves forward one step at a time, and only as
/// the result of handling a message.
pub fn valid_ack_progress(state: &State) -> bool {
    let Some(prev) = state.prev() else {
        return true;
    };
    let (Some(new), Some(old)) =
        (state.node_as::<Client>(CLIENT), prev.node_as::<Client>(CLIENT))
    else {
        return true;
    };

    if new.ack() == old.ack() + 1 {
        return matches!(state.event().kind(), EventKind::Handle | EventKind::HandleDuplicate);
    }

    new.ack() <= old.ack() + 1
}

/// Every pong in flight answers an id the client may have asked for. The
/// client never pings beyond `ack + 1`, so a larger pong id means the
/// server made it up.
pub fn replies_answer_pings(state: &State) -> bool {
    let Some(client) = state.node_as::<Client>(CLIENT) else {
        return true;
    };
    state
        .network()
        .iter()
        .filter_map(|m| m.downcast_ref::<PongMessage>())
        .all(|pong| pong.id <= client.ack() + 1)
}

/// Conjunction of the protocol invariants.
pub fn invariant(state: &State) -> bool {
    valid_ack_progress(state) && replies_answer_pings(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_seeded_model_runs_to_completion() {
        let root = Arc::new(seeded_model(Server::new(false, false), 5));
        assert_eq!(root.network_len(), 1);
        assert_eq!(root.next_states().len(), 1);

        let mut frontier = vec![root];
        let mut last = Vec::new();
        while !frontier.is_empty() {
            let next: Vec<_> = frontier.iter().flat_map(|s| s.next_states()).collect();
            if next.is_empty() {
                last = frontier;
                break;
            }
            frontier = next;
        }

        assert!(!last.is_empty());
        assert!(last.iter().all(|s| is_final(s)));
    }

    #[test]
    fn test_made_up_reply_is_invalid() {
        let mut state = model(false, false, Server::new(false, false), 5);
        assert!(invariant(&state));
        state.send(PongMessage::new(SERVER, CLIENT, 1));
        assert!(replies_answer_pings(&state));
        state.send(PongMessage::new(SERVER, CLIENT, 2));
        assert!(!replies_answer_pings(&state));
    }

    #[test]
    fn test_root_is_valid() {
        let root = model(false, false, Server::new(false, false), 5);
        assert!(valid_ack_progress(&root));
        assert!(!is_final(&root));
    }
}
