//! Proposer scheduling: in-turn/out-of-turn difficulty and the deterministic
//! back-off delay an out-of-turn signer must respect (Ramanujan fork onward).

use super::constants::{DIFF_INTURN, DIFF_NOTURN, INITIAL_BACKOFF_SECS, WIGGLE_TIME_SECS};
use super::snapshot::Snapshot;
use alloy_primitives::{Address, U256};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use sha2::{Digest, Sha256};

/// Difficulty the proposer must set given whether it is the in-turn validator.
pub fn difficulty(is_inturn: bool) -> U256 {
    if is_inturn { DIFF_INTURN } else { DIFF_NOTURN }
}

/// Total weight a [`Snapshot::frequency_table`] must sum to.
pub const PRECISION: u64 = 1000;

/// Stake-weighted proposer for `block_number` (post fast-finality fork).
///
/// Deterministically picks a point `target = SHA-256(LE64(block_number)) mod
/// PRECISION` and walks the table's cumulative weights, returning the first
/// validator whose running total exceeds it. `None` if the snapshot carries
/// no frequency table (round-robin scheduling still applies) or the table is
/// empty.
pub fn stake_weighted_proposer(snap: &Snapshot, block_number: u64) -> Option<Address> {
    let table = snap.frequency_table.as_ref()?;
    if table.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    hasher.update(block_number.to_le_bytes());
    let digest = hasher.finalize();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    let target = u64::from_le_bytes(seed_bytes) % PRECISION;

    let mut cumulative = 0u64;
    for (addr, weight) in table {
        cumulative += weight;
        if cumulative > target {
            return Some(*addr);
        }
    }
    table.last().map(|(addr, _)| *addr)
}

/// Builds the stake-weighted frequency table for the next epoch.
///
/// `stakes` is `(validator, stake)` for every currently active validator;
/// `recently_signed` excludes validators that cannot propose right now.
/// Implements the spec's 5-step derivation: drop zero-stake/recently-signed
/// validators, assign a base weight proportional to stake, enforce a
/// `PRECISION / (2N)` floor, redistribute the rounding deficit onto entries
/// above the floor (bounded to 10 passes), then sort ascending by address.
pub fn build_frequency_table(
    stakes: &[(Address, u64)],
    recently_signed: &std::collections::HashSet<Address>,
) -> Vec<(Address, u64)> {
    let mut eligible: Vec<(Address, u64)> = stakes
        .iter()
        .copied()
        .filter(|(addr, stake)| *stake > 0 && !recently_signed.contains(addr))
        .collect();
    if eligible.is_empty() {
        return Vec::new();
    }
    eligible.sort_by_key(|(addr, _)| *addr);

    let total_stake: u128 = eligible.iter().map(|(_, s)| *s as u128).sum();
    let n = eligible.len() as u64;
    let min_weight = PRECISION / (2 * n).max(1);

    let mut weights: Vec<u64> = eligible
        .iter()
        .map(|(_, stake)| {
            let w = (*stake as u128 * PRECISION as u128 / total_stake) as u64;
            w.max(min_weight)
        })
        .collect();

    for _ in 0..10 {
        let sum: u64 = weights.iter().sum();
        if sum == PRECISION {
            break;
        }
        if sum > PRECISION {
            let mut deficit = sum - PRECISION;
            for w in weights.iter_mut() {
                if deficit == 0 {
                    break;
                }
                let headroom = w.saturating_sub(min_weight);
                let take = headroom.min(deficit);
                *w -= take;
                deficit -= take;
            }
        } else {
            let mut surplus = PRECISION - sum;
            for w in weights.iter_mut() {
                if surplus == 0 {
                    break;
                }
                if *w > min_weight {
                    *w += 1;
                    surplus -= 1;
                }
            }
            if surplus > 0 {
                // every entry is already pinned to the floor; hand the
                // remainder to the first entry rather than loop forever.
                weights[0] += surplus;
            }
        }
    }

    eligible.into_iter().zip(weights).map(|((addr, _), w)| (addr, w)).collect()
}

/// Seconds an out-of-turn signer must wait beyond `parent.time + period` before
/// its block becomes valid (Ramanujan fork). In-turn signers always get 0.
///
/// `block_number` is the number of the block being produced/verified (i.e.
/// `snap.block_number + 1`). Pre-Bohr the shuffle seed is the snapshot's
/// block number; post-Bohr it is `block_number / turn_length`, so all blocks
/// within one validator's turn share the same shuffle order.
pub fn back_off_time(snap: &Snapshot, block_number: u64, validator: Address, is_bohr: bool) -> u64 {
    if snap.is_inturn(validator) {
        return 0;
    }

    let counts = snap.count_recent_proposers();
    // A validator that has already exhausted its turn budget cannot sign at
    // all right now; the delay it would need is moot.
    if snap.sign_recently_by_counts(validator, &counts) {
        return 0;
    }

    let inturn_validator = snap.inturn_validator();
    // If the in-turn validator itself can't sign, nobody needs to wait out
    // the usual initial grace period for it to show up.
    let initial_backoff =
        if snap.sign_recently_by_counts(inturn_validator, &counts) { 0 } else { INITIAL_BACKOFF_SECS };

    let turn_length = u64::from(snap.turn_length.unwrap_or(1)).max(1);

    let mut candidates: Vec<Address> = snap
        .validators
        .iter()
        .copied()
        .filter(|v| !snap.sign_recently_by_counts(*v, &counts))
        .filter(|v| !is_bohr || *v != inturn_validator)
        .collect();

    let seed = if is_bohr { block_number / turn_length } else { snap.block_number };
    let mut rng = StdRng::seed_from_u64(seed);
    candidates.shuffle(&mut rng);

    let shuffle_index = candidates.iter().position(|v| *v == validator).unwrap_or(0) as u64;
    initial_backoff + shuffle_index * WIGGLE_TIME_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::parlia::snapshot::DEFAULT_EPOCH_LENGTH;
    use alloy_primitives::B256;

    fn validators(n: u8) -> Vec<Address> {
        (0..n).map(|i| Address::from([i; 20])).collect()
    }

    #[test]
    fn inturn_validator_has_zero_backoff() {
        let snap = Snapshot::new(validators(5), 10, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        let inturn = snap.inturn_validator();
        assert_eq!(back_off_time(&snap, 11, inturn, true), 0);
    }

    #[test]
    fn out_of_turn_backoff_is_deterministic() {
        let snap = Snapshot::new(validators(5), 10, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        let inturn = snap.inturn_validator();
        let other = snap.validators.iter().copied().find(|v| *v != inturn).unwrap();
        let d1 = back_off_time(&snap, 11, other, true);
        let d2 = back_off_time(&snap, 11, other, true);
        assert_eq!(d1, d2);
        assert!(d1 >= INITIAL_BACKOFF_SECS);
    }

    #[test]
    fn recently_signed_validator_gets_zero_backoff() {
        let mut snap = Snapshot::new(validators(5), 10, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        let target = snap.validators[1];
        snap.recent_proposers.insert(10, target);
        assert!(snap.sign_recently(target));
        assert_eq!(back_off_time(&snap, 11, target, true), 0);
    }

    #[test]
    fn frequency_table_weights_sum_to_precision() {
        let stakes: Vec<(Address, u64)> = validators(7).into_iter().zip([10, 20, 30, 5, 5, 100, 1]).collect();
        let table = build_frequency_table(&stakes, &std::collections::HashSet::new());
        assert_eq!(table.iter().map(|(_, w)| w).sum::<u64>(), PRECISION);
        // sorted ascending by address.
        assert!(table.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn frequency_table_excludes_zero_stake_and_recently_signed() {
        let vs = validators(3);
        let stakes = vec![(vs[0], 0), (vs[1], 50), (vs[2], 50)];
        let mut recently_signed = std::collections::HashSet::new();
        recently_signed.insert(vs[2]);
        let table = build_frequency_table(&stakes, &recently_signed);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].0, vs[1]);
        assert_eq!(table[0].1, PRECISION);
    }

    #[test]
    fn stake_weighted_proposer_is_deterministic() {
        let mut snap = Snapshot::new(validators(5), 10, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        let stakes: Vec<(Address, u64)> = snap.validators.iter().copied().map(|a| (a, 10)).collect();
        snap.frequency_table = Some(build_frequency_table(&stakes, &std::collections::HashSet::new()));
        let a = stake_weighted_proposer(&snap, 42);
        let b = stake_weighted_proposer(&snap, 42);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn stake_weighted_proposer_absent_without_table() {
        let snap = Snapshot::new(validators(5), 10, B256::ZERO, DEFAULT_EPOCH_LENGTH, None);
        assert_eq!(stake_weighted_proposer(&snap, 42), None);
    }
}
