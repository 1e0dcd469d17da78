use std::collections::{BTreeMap, HashMap};

use super::vote::{VoteAddress, VoteAttestation, VoteData};
use alloy_primitives::{Address, BlockNumber, B256};
use serde::{Deserialize, Serialize};
use reth_db::table::{Compress, Decompress};
use reth_db::DatabaseError;
use bytes::BufMut;

/// Number of blocks after which we persist snapshots to DB.
pub const CHECKPOINT_INTERVAL: u64 = 1024;

/// Default epoch length before any epoch-length-changing fork is active.
pub const DEFAULT_EPOCH_LENGTH: u64 = 200;
/// Epoch length after the Lorentz hard-fork.
pub const LORENTZ_EPOCH_LENGTH: u64 = 500;
/// Epoch length after the Maxwell hard-fork.
pub const MAXWELL_EPOCH_LENGTH: u64 = 1000;
/// Default seconds between blocks (BSC mainnet block period).
pub const DEFAULT_BLOCK_INTERVAL: u64 = 3;

/// `ValidatorInfo` holds metadata for a validator at a given epoch.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ValidatorInfo {
    /// 1-based index (offset by +1) within `validators` list.
    pub index: u64,
    /// Validator's BLS vote address (optional before Bohr upgrade; zero bytes if unknown).
    pub vote_addr: VoteAddress,
}

/// In-memory snapshot of Parlia epoch state.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current epoch length. (200 for legacy, changes after Bohr).
    pub epoch_num: u64,
    /// Block number of the epoch boundary.
    pub block_number: BlockNumber,
    /// Hash of that block.
    pub block_hash: B256,
    /// Sorted validator set (ascending by address).
    pub validators: Vec<Address>,
    /// Extra information about validators (index + vote addr).
    pub validators_map: HashMap<Address, ValidatorInfo>,
    /// Map of recent proposers: block â†’ proposer address.
    pub recent_proposers: BTreeMap<BlockNumber, Address>,
    /// Latest vote data attested by the validator set.
    pub vote_data: VoteData,
    /// Configurable turn-length (default = 1 before Bohr).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_length: Option<u8>,
    /// Seconds between blocks (the consensus "period"); carried across `apply`.
    #[serde(default = "default_block_interval")]
    pub block_interval: u64,
    /// 4-byte `next_fork_hash` tag (vanity's trailing bytes) recorded per
    /// recent block, parallel to `recent_proposers`, for fork-majority stats.
    #[serde(default)]
    pub recent_fork_hashes: BTreeMap<BlockNumber, [u8; 4]>,
    /// Stake-weighted proposer selection table (post fast-finality fork):
    /// ascending-address-sorted `(validator, cumulative weight)` pairs whose
    /// weights sum to [`super::scheduler::PRECISION`]. `None` before the fork
    /// or when the round-robin scheduler is still authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_table: Option<Vec<(Address, u64)>>,
}

fn default_block_interval() -> u64 { DEFAULT_BLOCK_INTERVAL }

impl Snapshot {
    /// Create a brand-new snapshot at an epoch boundary.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mut validators: Vec<Address>,
        block_number: BlockNumber,
        block_hash: B256,
        epoch_num: u64,
        vote_addrs: Option<Vec<VoteAddress>>, // one-to-one with `validators`
    ) -> Self {
        // Keep validators sorted.
        validators.sort();

        let mut validators_map = HashMap::new();
        if let Some(vote_addrs) = vote_addrs {
            assert_eq!(
                validators.len(),
                vote_addrs.len(),
                "validators and vote_addrs length not equal",
            );

            for (i, v) in validators.iter().enumerate() {
                let info = ValidatorInfo { index: i as u64 + 1, vote_addr: vote_addrs[i] };
                validators_map.insert(*v, info);
            }
        } else {
            // Pre-Bohr, vote addresses are unknown.
            for v in &validators {
                validators_map.insert(*v, Default::default());
            }
        }

        Self {
            epoch_num,
            block_number,
            block_hash,
            validators,
            validators_map,
            recent_proposers: Default::default(),
            vote_data: Default::default(),
            turn_length: Some(1),
            block_interval: DEFAULT_BLOCK_INTERVAL,
            recent_fork_hashes: Default::default(),
            frequency_table: None,
        }
    }

    /// Override the block interval (seconds), e.g. once read from chain config.
    pub fn with_block_interval(mut self, block_interval: u64) -> Self {
        self.block_interval = block_interval;
        self
    }

    /// Apply `next_header` (proposed by `validator`) plus any epoch changes to produce a new snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &self,
        validator: Address,
        next_header: &alloy_consensus::Header,
        mut new_validators: Vec<Address>,
        vote_addrs: Option<Vec<VoteAddress>>, // for epoch switch
        attestation: Option<VoteAttestation>,
        turn_length: Option<u8>,
        is_bohr: bool,
    ) -> Option<Self> {
        let block_number = next_header.number;
        if self.block_number + 1 != block_number {
            return None; // non-continuous block
        }

        // Clone base.
        let mut snap = self.clone();
        snap.block_hash = next_header.hash_slow();
        snap.block_number = block_number;

        // Maintain recent proposer window.
        let limit = self.miner_history_check_len() + 1;
        if block_number >= limit {
            snap.recent_proposers.remove(&(block_number - limit));
            snap.recent_fork_hashes.remove(&(block_number - limit));
        }

        // Validate proposer belongs to validator set and hasn't over-proposed.
        if !snap.validators.contains(&validator) {
            return None;
        }
        if snap.sign_recently(validator) {
            return None;
        }
        snap.recent_proposers.insert(block_number, validator);
        if next_header.extra_data.len() >= super::constants::EXTRA_VANITY {
            let mut tag = [0u8; 4];
            tag.copy_from_slice(
                &next_header.extra_data[super::constants::EXTRA_VANITY - 4..super::constants::EXTRA_VANITY],
            );
            snap.recent_fork_hashes.insert(block_number, tag);
        }

        // Epoch change.
        let epoch_key = u64::MAX - next_header.number / snap.epoch_num;
        if !new_validators.is_empty() && (!is_bohr || !snap.recent_proposers.contains_key(&epoch_key)) {
            new_validators.sort();
            if let Some(tl) = turn_length { snap.turn_length = Some(tl) }

            if is_bohr {
                snap.recent_proposers = Default::default();
                snap.recent_proposers.insert(epoch_key, Address::default());
                snap.recent_fork_hashes = Default::default();
            } else {
                let new_limit = (new_validators.len() / 2 + 1) as u64;
                if new_limit < limit {
                    for i in 0..(limit - new_limit) {
                        snap.recent_proposers.remove(&(block_number - new_limit - i));
                    }
                }
            }

            // Build new validators map.
            let mut validators_map = HashMap::new();
            if let Some(vote_addrs) = vote_addrs {
                assert_eq!(
                    new_validators.len(),
                    vote_addrs.len(),
                    "validators and vote_addrs length not equal",
                );

                for (i, v) in new_validators.iter().enumerate() {
                    validators_map.insert(*v, ValidatorInfo { index: i as u64 + 1, vote_addr: vote_addrs[i] });
                }
            } else {
                for v in &new_validators { validators_map.insert(*v, Default::default()); }
            }
            snap.validators = new_validators;
            snap.validators_map = validators_map;
        }

        // Advance the justified/finalized frontier. Only an attestation whose
        // target is this block's parent can move it forward; a finalized
        // source is only adopted alongside it when the two are contiguous
        // (`source+1 == target`) — otherwise the previously finalized source
        // survives a reorg of the justified tip.
        if let Some(att) = attestation {
            if att.data.target_hash == next_header.parent_hash
                && att.data.target_number + 1 == block_number
            {
                let mut data = att.data;
                if data.source_number + 1 != data.target_number {
                    data.source_number = snap.vote_data.source_number;
                    data.source_hash = snap.vote_data.source_hash;
                }
                snap.vote_data = data;
            }
        }

        Some(snap)
    }

    /// Returns `true` if `tag` was recorded by more than half the window of
    /// recently-seen fork hashes.
    pub fn majority_fork(&self, tag: [u8; 4]) -> bool {
        if self.recent_fork_hashes.is_empty() {
            return false;
        }
        let count = self.recent_fork_hashes.values().filter(|&&v| v == tag).count();
        count * 2 > self.recent_fork_hashes.len()
    }

    /// Returns `true` if `proposer` is in-turn according to snapshot rules.
    ///
    /// Defers to the stake-weighted table when one is present (post
    /// fast-finality fork); falls back to round-robin otherwise.
    pub fn is_inturn(&self, proposer: Address) -> bool { self.expected_proposer() == proposer }

    /// The validator expected to produce the next block: stake-weighted pick
    /// when [`Self::frequency_table`] is populated, round-robin otherwise.
    pub fn expected_proposer(&self) -> Address {
        if self.frequency_table.is_some() {
            if let Some(addr) = super::scheduler::stake_weighted_proposer(self, self.block_number + 1) {
                return addr;
            }
        }
        self.inturn_validator()
    }

    /// Number of blocks to look back when checking proposer history.
    pub fn miner_history_check_len(&self) -> u64 {
        let turn = u64::from(self.turn_length.unwrap_or(1));
        (self.validators.len() / 2 + 1) as u64 * turn - 1
    }

    /// Validator that should propose the **next** block.
    pub fn inturn_validator(&self) -> Address {
        let turn = u64::from(self.turn_length.unwrap_or(1));
        self.validators[((self.block_number + 1) / turn) as usize % self.validators.len()]
    }

    /// Returns index in `validators` for `validator` if present.
    pub fn index_of(&self, validator: Address) -> Option<usize> {
        self.validators.iter().position(|&v| v == validator)
    }

    /// Count how many times each validator has signed in the recent window.
    pub fn count_recent_proposers(&self) -> HashMap<Address, u8> {
        let left_bound = if self.block_number > self.miner_history_check_len() {
            self.block_number - self.miner_history_check_len()
        } else { 0 };
        let mut counts = HashMap::new();
        for (&block, &v) in &self.recent_proposers {
            if block <= left_bound || v == Address::default() { continue; }
            *counts.entry(v).or_insert(0) += 1;
        }
        counts
    }

    /// Returns `true` if `validator` has signed too many blocks recently.
    pub fn sign_recently(&self, validator: Address) -> bool {
        self.sign_recently_by_counts(validator, &self.count_recent_proposers())
    }

    /// Helper that takes pre-computed counts.
    pub fn sign_recently_by_counts(&self, validator: Address, counts: &HashMap<Address, u8>) -> bool {
        if let Some(&times) = counts.get(&validator) {
            let allowed = u64::from(self.turn_length.unwrap_or(1));
            if u64::from(times) >= allowed { return true; }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// DB compression helpers (same approach as zoro_reth)
// ---------------------------------------------------------------------------

impl Compress for Snapshot {
    type Compressed = Vec<u8>;

    fn compress(self) -> Self::Compressed { serde_cbor::to_vec(&self).expect("serialize Snapshot") }

    fn compress_to_buf<B: bytes::BufMut + AsMut<[u8]>>(&self, buf: &mut B) {
        let bytes = self.clone().compress();
        buf.put_slice(&bytes);
    }
}

impl Decompress for Snapshot {
    fn decompress(value: &[u8]) -> Result<Self, DatabaseError> {
        serde_cbor::from_slice(value).map_err(|_| DatabaseError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_consensus::Header as ConsensusHeader;

    fn validators(n: u8) -> Vec<Address> {
        (0..n).map(|i| Address::from([i; 20])).collect()
    }

    fn header_at(number: u64, parent_hash: B256) -> ConsensusHeader {
        ConsensusHeader { number, parent_hash, ..Default::default() }
    }

    #[test]
    fn in_turn_ladder_accepts_round_robin_signers() {
        // S1: 3 validators, turn_length=1; blocks 1..3 signed round-robin.
        let mut snap = Snapshot::new(validators(3), 0, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        for i in 1u64..=3 {
            let signer = snap.validators[(i as usize) % 3];
            let h = header_at(i, snap.block_hash);
            snap = snap.apply(signer, &h, Vec::new(), None, None, None, false).unwrap();
        }
        assert_eq!(snap.block_number, 3);
        assert!(snap.recent_proposers.len() <= snap.validators.len());
    }

    #[test]
    fn recently_signed_validator_is_rejected() {
        // S3: the same validator cannot sign twice within the window.
        let snap = Snapshot::new(validators(3), 0, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        let signer = snap.validators[1];
        let h1 = header_at(1, snap.block_hash);
        let snap = snap.apply(signer, &h1, Vec::new(), None, None, None, false).unwrap();
        let h2 = header_at(2, snap.block_hash);
        assert!(snap.apply(signer, &h2, Vec::new(), None, None, None, false).is_none());
    }

    #[test]
    fn majority_fork_requires_strict_majority() {
        // S6: 30 entries of one tag, 10 of another.
        let mut snap = Snapshot::new(validators(3), 0, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        let majority_tag = [0x12, 0x34, 0x56, 0x78];
        let minority_tag = [0xAA, 0xBB, 0xCC, 0xDD];
        for i in 0..30u64 {
            snap.recent_fork_hashes.insert(i, majority_tag);
        }
        for i in 30..40u64 {
            snap.recent_fork_hashes.insert(i, minority_tag);
        }
        assert!(snap.majority_fork(majority_tag));
        assert!(!snap.majority_fork(minority_tag));
    }

    #[test]
    fn attestation_advances_only_when_target_is_parent() {
        let snap = Snapshot::new(validators(3), 10, B256::repeat_byte(1), DEFAULT_EPOCH_LENGTH, None);
        let signer = snap.validators[0];
        let h = header_at(11, snap.block_hash);

        let mismatched = VoteAttestation {
            vote_address_set: 0,
            agg_signature: Default::default(),
            data: VoteData {
                source_number: 5,
                source_hash: B256::repeat_byte(2),
                target_number: 9, // not header.parent_hash's number
                target_hash: B256::repeat_byte(9),
            },
            extra: Default::default(),
        };
        let applied = snap
            .apply(signer, &h, Vec::new(), None, Some(mismatched), None, false)
            .unwrap();
        assert_eq!(applied.vote_data, VoteData::default());
    }

    #[test]
    fn attestation_preserves_finalized_source_across_reorg_of_justified_tip() {
        let mut snap = Snapshot::new(validators(3), 10, B256::repeat_byte(1), DEFAULT_EPOCH_LENGTH, None);
        snap.vote_data = VoteData {
            source_number: 7,
            source_hash: B256::repeat_byte(7),
            target_number: 8,
            target_hash: B256::repeat_byte(8),
        };
        let signer = snap.validators[0];
        let h = header_at(11, snap.block_hash);

        // Attestation's own source/target aren't contiguous (9+1 != 10 would
        // be contiguous with target=10, so force a gap): source=5, target=10.
        let non_contiguous = VoteAttestation {
            vote_address_set: 0,
            agg_signature: Default::default(),
            data: VoteData {
                source_number: 5,
                source_hash: B256::repeat_byte(5),
                target_number: 10,
                target_hash: snap.block_hash,
            },
            extra: Default::default(),
        };
        let applied = snap
            .apply(signer, &h, Vec::new(), None, Some(non_contiguous), None, false)
            .unwrap();
        // Previously finalized source (7) survives; only the justified target moves.
        assert_eq!(applied.vote_data.source_number, 7);
        assert_eq!(applied.vote_data.source_hash, B256::repeat_byte(7));
        assert_eq!(applied.vote_data.target_number, 10);
    }
}