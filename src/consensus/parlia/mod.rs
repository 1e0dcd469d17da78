//! Parlia (Proof-of-Staked-Authority) consensus: validator-set snapshots,
//! header verification, proposer scheduling, and the fast-finality vote
//! attestation protocol.

// Re-export core sub-modules so that external crates can simply do:
// `use reth_bsc::consensus::parlia::{Snapshot, VoteAddress, ...};`
pub mod vote;
pub mod snapshot;
pub mod provider;
pub mod validator;
pub mod validation;
pub mod hertz_patch;
pub mod constants;
pub mod error;
pub mod attestation;
pub mod gas;
pub mod hooks;
pub mod slash_pool;
pub mod transaction_splitter;
pub mod consensus;
pub mod util;
pub mod scheduler;
pub mod seal;
pub mod vote_pool;
pub mod double_sign;

pub use snapshot::{Snapshot, ValidatorInfo, CHECKPOINT_INTERVAL};
pub use vote::{VoteAddress, VoteAttestation, VoteData, VoteEnvelope, VoteSignature, ValidatorsBitSet};
pub use provider::InMemorySnapshotProvider;
pub use constants::*;
pub use error::ParliaConsensusError;
pub use attestation::parse_vote_attestation_from_header;
pub use validator::{ParliaHeaderValidator, SnapshotProvider};
pub use validation::BscConsensusValidator;
pub use hertz_patch::{HertzPatchManager, StoragePatch};
pub use transaction_splitter::{TransactionSplitter, SplitTransactions, TransactionSplitterError};
pub use consensus::ParliaConsensus;
pub use util::hash_with_chain_id;
pub use scheduler::{back_off_time, build_frequency_table, difficulty, stake_weighted_proposer, PRECISION};
pub use seal::SealBlock;
pub use vote_pool::{put_vote, drain, fetch_by_block_hash, prune_below};
pub use double_sign::{double_sign_count, observe as observe_double_sign};

/// Epoch length (200 blocks on BSC main-net).
pub const EPOCH: u64 = 200;
// Note: CHECKPOINT_INTERVAL is already defined in snapshot.rs and re-exported

pub mod db;
