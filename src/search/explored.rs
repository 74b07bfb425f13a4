use crate::base::State;
use fnv::FnvHashMap;
use std::sync::Arc;

/// Set of visited states, bucketed by [`State::hash_code`] with collisions
/// resolved by [`State::equals`].
#[derive(Default)]
pub struct ExploredSet {
    buckets: FnvHashMap<u64, Vec<Arc<State>>>,
    len: usize,
}

impl ExploredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, state: &State) -> bool {
        self.buckets
            .get(&state.hash_code())
            .is_some_and(|bucket| bucket.iter().any(|s| s.equals(state)))
    }

    /// Insert `state` unless an equal state is present. Returns whether it
    /// was inserted.
    ///
    /// Stored states are hash-sorted, so their successors come out in the
    /// same order whoever expands them and whenever.
    pub fn insert(&mut self, state: Arc<State>) -> bool {
        state.hash_sort();
        let bucket = self.buckets.entry(state.hash_code()).or_default();
        if bucket.iter().any(|s| s.equals(&state)) {
            return false;
        }
        bucket.push(state);
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pingpong::{PingMessage, PongMessage, Server};

    fn state(messages: &[(u32, bool)]) -> Arc<State> {
        let mut state = State::new(0, false, false);
        state.add_node("server", Server::new(false, false), &[]);
        for &(id, ping) in messages {
            if ping {
                state.send(PingMessage::new("client", "server", id));
            } else {
                state.send(PongMessage::new("server", "client", id));
            }
        }
        Arc::new(state)
    }

    #[test]
    fn test_dedup_ignores_network_order() {
        let mut explored = ExploredSet::new();
        assert!(explored.insert(state(&[(1, true), (1, false)])));
        assert!(!explored.insert(state(&[(1, false), (1, true)])));
        assert!(explored.contains(&state(&[(1, false), (1, true)])));
        assert_eq!(explored.len(), 1);

        assert!(explored.insert(state(&[(2, true)])));
        assert!(!explored.contains(&state(&[(3, true)])));
        assert_eq!(explored.len(), 2);
    }

    #[test]
    fn test_inserted_states_are_sorted() {
        let mut explored = ExploredSet::new();
        let fresh = state(&[(9, true), (4, false), (2, true)]);
        assert!(!fresh.is_hash_sorted());

        explored.insert(fresh.clone());
        assert!(fresh.is_hash_sorted());

        // expansion order no longer depends on when the state was compared
        let first: Vec<u64> = fresh.next_states().iter().map(|s| s.hash_code()).collect();
        fresh.hash_sort();
        let second: Vec<u64> = fresh.next_states().iter().map(|s| s.hash_code()).collect();
        assert_eq!(first, second);
    }
}
