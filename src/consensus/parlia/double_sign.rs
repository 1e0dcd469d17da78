//! Double-sign detection: a validator producing two different headers for
//! the same `(parent_hash, coinbase)` slot. Never fatal to verification —
//! only a warning and a bumped counter, per the spec's "Double-sign
//! detection" note in the header verifier.

use alloy_primitives::{Address, B256};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use schnellru::{ByLength, LruMap};

/// How many `(parent_hash, coinbase)` slots to remember.
const CAPACITY: u32 = 4096;

static SEEN: Lazy<RwLock<LruMap<(B256, Address), B256, ByLength>>> =
    Lazy::new(|| RwLock::new(LruMap::new(ByLength::new(CAPACITY))));

static DOUBLE_SIGN_COUNT: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Records that `coinbase` signed `header_hash` as the child of `parent_hash`.
///
/// Returns `true` if this is a double-sign (the same slot previously
/// produced a *different* header hash). Logs a warning and bumps the
/// process-wide counter when it is; does not reject the header either way.
pub fn observe(parent_hash: B256, coinbase: Address, header_hash: B256) -> bool {
    let key = (parent_hash, coinbase);
    let mut seen = SEEN.write();
    match seen.get(&key) {
        Some(prior) if *prior != header_hash => {
            tracing::warn!(
                target: "parlia::double_sign",
                %coinbase, %parent_hash, prior_hash = %prior, new_hash = %header_hash,
                "validator double-signed a block"
            );
            DOUBLE_SIGN_COUNT.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            true
        }
        Some(_) => false,
        None => {
            seen.insert(key, header_hash);
            false
        }
    }
}

/// Total double-signs observed so far (process-wide metric).
pub fn double_sign_count() -> u64 {
    DOUBLE_SIGN_COUNT.load(std::sync::atomic::Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_not_a_double_sign() {
        let parent = B256::repeat_byte(1);
        let coinbase = Address::repeat_byte(2);
        assert!(!observe(parent, coinbase, B256::repeat_byte(3)));
    }

    #[test]
    fn conflicting_hash_for_same_slot_is_flagged() {
        let parent = B256::repeat_byte(10);
        let coinbase = Address::repeat_byte(20);
        let before = double_sign_count();
        assert!(!observe(parent, coinbase, B256::repeat_byte(30)));
        assert!(observe(parent, coinbase, B256::repeat_byte(31)));
        assert_eq!(double_sign_count(), before + 1);
    }

    #[test]
    fn repeating_the_same_hash_is_not_flagged() {
        let parent = B256::repeat_byte(40);
        let coinbase = Address::repeat_byte(50);
        assert!(!observe(parent, coinbase, B256::repeat_byte(60)));
        assert!(!observe(parent, coinbase, B256::repeat_byte(60)));
    }
}
