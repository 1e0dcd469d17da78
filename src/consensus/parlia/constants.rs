//! Parlia/BSC consensus constants for header `extraData` parsing.
//! Values copied from the Go reference (`parlia.go`).

use alloy_primitives::U256;

/// Fixed 32-byte vanity prefix present in every header.
pub const EXTRA_VANITY: usize = 32;
/// Fixed 65-byte ECDSA signature suffix (r,s,v).
pub const EXTRA_SEAL: usize = 65;
/// 1-byte length field preceding validator bytes since Luban.
pub const VALIDATOR_NUMBER_SIZE: usize = 1;
/// Size of each validator address (20 bytes) before Luban.
pub const VALIDATOR_BYTES_LEN_BEFORE_LUBAN: usize = 20;
/// Size of each validator consensus address (20) + vote address (48) after Luban.
pub const VALIDATOR_BYTES_LEN_AFTER_LUBAN: usize = 68;
/// 1-byte turnLength suffix added in Bohr.
pub const TURN_LENGTH_SIZE: usize = 1;

/// Alias of [`EXTRA_VANITY`] used by the older extra-data parsing helpers.
pub const EXTRA_VANITY_LEN: usize = EXTRA_VANITY;
/// Alias of [`EXTRA_SEAL`] used by the older extra-data parsing helpers.
pub const EXTRA_SEAL_LEN: usize = EXTRA_SEAL;
/// Vanity prefix plus the 1-byte validator-count field (post-Luban epoch blocks).
pub const EXTRA_VANITY_LEN_WITH_VALIDATOR_NUM: usize = EXTRA_VANITY + VALIDATOR_NUMBER_SIZE;
/// Alias of [`VALIDATOR_BYTES_LEN_AFTER_LUBAN`].
pub const EXTRA_VALIDATOR_LEN: usize = VALIDATOR_BYTES_LEN_AFTER_LUBAN;
/// Alias of [`VALIDATOR_BYTES_LEN_BEFORE_LUBAN`].
pub const EXTRA_VALIDATOR_LEN_BEFORE_LUBAN: usize = VALIDATOR_BYTES_LEN_BEFORE_LUBAN;

/// Difficulty value used by the in-turn proposer.
pub const DIFF_INTURN: U256 = U256::from_limbs([2, 0, 0, 0]);
/// Difficulty value used by an out-of-turn proposer.
pub const DIFF_NOTURN: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Base seconds an out-of-turn signer must wait beyond `parent.time + period`.
pub const INITIAL_BACKOFF_SECS: u64 = 1;
/// Additional per-shuffle-slot wiggle, in seconds.
pub const WIGGLE_TIME_SECS: u64 = 1;
/// Upper bound (seconds) a sealer waits for an in-turn block before publishing anyway.
pub const PROCESS_BACKOFF_SECS: u64 = 1; 