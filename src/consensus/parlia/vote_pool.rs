use once_cell::sync::Lazy;
use std::{collections::HashSet, sync::Mutex};

use alloy_primitives::B256;

use super::vote::VoteEnvelope;

/// Global in-memory pool of incoming Parlia votes.
///
/// This mirrors the simple approach used by the slashing pool: keep votes in
/// memory until they're consumed by another component. Votes are de-duplicated
/// by their RLP hash.
struct VotePool {
    /// Hashes of votes we've already seen in this window.
    seen_hashes: HashSet<B256>,
    /// Collected votes (deduplicated by `seen_hashes`).
    votes: Vec<VoteEnvelope>,
}

impl VotePool {
    fn new() -> Self {
        Self { seen_hashes: HashSet::new(), votes: Vec::new() }
    }

    fn insert(&mut self, vote: VoteEnvelope) {
        let vote_hash = vote.hash();
        if self.seen_hashes.insert(vote_hash) {
            self.votes.push(vote);
        }
    }

    fn drain(&mut self) -> Vec<VoteEnvelope> {
        self.seen_hashes.clear();
        std::mem::take(&mut self.votes)
    }

    fn len(&self) -> usize { self.votes.len() }

    fn votes_for_target(&self, target_hash: B256) -> Vec<VoteEnvelope> {
        self.votes.iter().filter(|v| v.data.target_hash == target_hash).cloned().collect()
    }

    /// Drop votes whose target is older than `min_target_number` (they can no
    /// longer be attested for any future block).
    fn prune_below(&mut self, min_target_number: u64) {
        self.votes.retain(|v| v.data.target_number >= min_target_number);
    }
}

/// Global singleton pool.
static VOTE_POOL: Lazy<Mutex<VotePool>> = Lazy::new(|| Mutex::new(VotePool::new()));

/// Insert a single vote into the pool (deduplicated by hash).
pub fn put_vote(vote: VoteEnvelope) {
    VOTE_POOL.lock().expect("vote pool poisoned").insert(vote);
}

/// Drain all pending votes.
pub fn drain() -> Vec<VoteEnvelope> {
    VOTE_POOL.lock().expect("vote pool poisoned").drain()
}

/// Current number of queued votes.
pub fn len() -> usize { VOTE_POOL.lock().expect("vote pool poisoned").len() }

/// Fetch all pooled votes attesting to `target_hash` (the parent block the
/// producer is about to build on). Non-destructive: votes stay pooled so
/// other prospective children of the same parent can also assemble from them.
pub fn fetch_by_block_hash(target_hash: B256) -> Vec<VoteEnvelope> {
    VOTE_POOL.lock().expect("vote pool poisoned").votes_for_target(target_hash)
}

/// Drop votes that can no longer be attested for any future block, i.e. whose
/// target is behind the chain's current finalized/justified frontier.
pub fn prune_below(min_target_number: u64) {
    VOTE_POOL.lock().expect("vote pool poisoned").prune_below(min_target_number)
}


