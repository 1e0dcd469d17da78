//! Error taxonomy for the Parlia consensus core.
//!
//! Internal APIs (`consensus.rs`, `validation.rs`, `scheduler.rs`, `seal.rs`)
//! return `Result<_, ParliaConsensusError>` directly; code that sits behind a
//! reth `Consensus`/`HeaderValidator` impl wraps a variant via
//! `ConsensusError::Other(err.to_string())` at the boundary.

use alloy_primitives::{Address, BlockNumber, B256};

/// Errors produced while decoding, scheduling, or validating Parlia headers,
/// votes, and attestations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ParliaConsensusError {
    /// Referenced block is not present in the header store.
    #[error("unknown block: number {block_number}, hash {hash}")]
    UnknownBlock { block_number: BlockNumber, hash: B256 },

    /// A header's parent could not be located.
    #[error("unknown ancestor: block {block_number}, parent hash {parent_hash}")]
    UnknownAncestor { block_number: BlockNumber, parent_hash: B256 },

    /// Header timestamp is further in the future than the tolerated skew.
    #[error("future block: number {block_number}, timestamp {timestamp}")]
    FutureBlock { block_number: BlockNumber, timestamp: u64 },

    /// `extra_data` is shorter than the fixed vanity prefix.
    #[error("extra-data missing vanity prefix")]
    ExtraVanityMissing,

    /// `extra_data` is shorter than vanity + seal.
    #[error("extra-data missing signature suffix")]
    ExtraSignatureMissing,

    /// Epoch header's validator section length does not match its declared count.
    #[error("invalid header extra-data length: {header_extra_len}")]
    InvalidHeaderExtraLen { header_extra_len: u64 },

    /// Validator bytes present where they shouldn't be, or absent at an epoch boundary.
    #[error("invalid validator bytes length for epoch header ({is_epoch}): {validator_bytes_len}")]
    InvalidHeaderExtraValidatorBytesLen { is_epoch: bool, validator_bytes_len: usize },

    /// Validator list embedded in an epoch header is empty or malformed.
    #[error("invalid span validators in epoch header {block_number}")]
    InvalidSpanValidators { block_number: BlockNumber },

    /// `extra_data` too short to contain the turn-length byte a Bohr epoch header requires.
    #[error("extra-data missing turn-length byte")]
    ExtraInvalidTurnLength,

    /// Turn length decoded from the header is outside the allowed range.
    #[error("invalid turn length {turn_length} at block {block_number}")]
    InvalidTurnLength { block_number: BlockNumber, turn_length: u8 },

    /// Epoch header's validator set disagrees with the snapshot rebuilt from it.
    #[error("mismatching epoch validators at block {block_number}")]
    MismatchingEpochValidators { block_number: BlockNumber },

    /// Epoch header's turn length disagrees with the snapshot's.
    #[error("mismatching epoch turn length at block {block_number}: header {header_turn_length}, snapshot {snapshot_turn_length}")]
    MismatchingEpochTurnLength { block_number: BlockNumber, header_turn_length: u8, snapshot_turn_length: u8 },

    /// `mix_hash` is non-zero.
    #[error("invalid mix digest at block {block_number}")]
    InvalidMixDigest { block_number: BlockNumber },

    /// `ommers_hash` is not the empty-list hash.
    #[error("invalid uncle hash at block {block_number}")]
    InvalidUncleHash { block_number: BlockNumber },

    /// Difficulty is neither the in-turn nor out-of-turn constant.
    #[error("invalid difficulty {difficulty} at block {block_number}")]
    InvalidDifficulty { block_number: BlockNumber, difficulty: u64 },

    /// Difficulty does not match the value expected from turn order.
    #[error("wrong difficulty at block {block_number}: expected {expected}, got {got}")]
    WrongDifficulty { block_number: BlockNumber, expected: u64, got: u64 },

    /// Block number is not exactly one past its parent.
    #[error("out of range chain: block {block_number}, parent {parent_number}")]
    OutOfRangeChain { block_number: BlockNumber, parent_number: BlockNumber },

    /// Header hash does not match the hash recomputed from its fields.
    #[error("hash inconsistent at block {block_number}")]
    HashInconsistent { block_number: BlockNumber },

    /// Recovered proposer is not a member of the active validator set.
    #[error("unauthorized validator {validator} at block {block_number}")]
    UnauthorizedValidator { block_number: BlockNumber, validator: Address },

    /// `header.beneficiary` does not match the recovered seal signer.
    #[error("coinbase mismatch at block {block_number}: header {header_coinbase}, recovered {recovered}")]
    CoinBaseMismatch { block_number: BlockNumber, header_coinbase: Address, recovered: Address },

    /// Proposer signed within the anti-spam recency window.
    #[error("validator {validator} signed recently, block {block_number}")]
    RecentlySigned { block_number: BlockNumber, validator: Address },

    /// Vote attestation's target does not match its header's parent.
    #[error("attestation target mismatch at block {block_number}")]
    AttestationTargetMismatch { block_number: BlockNumber },

    /// Vote attestation's source does not match the justified ancestor.
    #[error("attestation source mismatch at block {block_number}")]
    AttestationSourceMismatch { block_number: BlockNumber },

    /// Fewer signers in the attestation bitset than the 2N/3 quorum requires.
    #[error("attestation quorum failure at block {block_number}: {signers} of {required} required")]
    AttestationQuorumFailure { block_number: BlockNumber, signers: usize, required: usize },

    /// BLS aggregate signature failed `fast_aggregate_verify`.
    #[error("attestation signature verification failed at block {block_number}")]
    AttestationSigVerifyFailure { block_number: BlockNumber },

    /// Attestation payload exceeds the maximum allowed extra-data length.
    #[error("attestation extra-data too large: {extra_len} bytes")]
    AttestationExtraTooLarge { extra_len: usize },

    /// Gossiped vote's target does not match any known header.
    #[error("vote target mismatch: {target_number}, {target_hash}")]
    VoteTargetMismatch { target_number: BlockNumber, target_hash: B256 },

    /// Gossiped vote's source does not match any known justified header.
    #[error("vote source mismatch: {source_number}, {source_hash}")]
    VoteSourceMismatch { source_number: BlockNumber, source_hash: B256 },

    /// Vote's BLS public key is not in the active validator set.
    #[error("vote from unauthorized validator, vote address {vote_address}")]
    VoteUnauthorized { vote_address: String },

    /// RLP decoding of an attestation or envelope failed.
    #[error("failed to decode attestation payload")]
    ABIDecodeInnerError,

    /// ECDSA recovery (signature/recovery-id/public-key derivation) failed.
    #[error("failed to recover ECDSA signer")]
    RecoverECDSAInnerError,
}
