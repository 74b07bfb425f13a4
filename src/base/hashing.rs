//! FNV hashing helpers for protocol authors and the state engine.

use super::message::Message;
use fnv::FnvHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// FNV-64 hash of `value`, salted with a type `prefix` so that two variants
/// with identical fields do not collide.
pub fn hash_of<T: Hash + ?Sized>(prefix: &str, value: &T) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(prefix.as_bytes());
    value.hash(&mut hasher);
    hasher.finish()
}

/// Combine the two aggregate sums of a state into its hash.
pub(crate) fn combine(node_hash: u64, network_hash: u64) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(&node_hash.to_be_bytes());
    hasher.write(&network_hash.to_be_bytes());
    hasher.finish()
}

/// Stable sort of messages by their hash, so two networks holding the same
/// messages in different orders compare position by position.
pub(crate) fn hash_sort(messages: &mut [Arc<dyn Message>]) {
    messages.sort_by_cached_key(|m| m.hash_code());
}
