pub mod bsc;

use bsc::BscHardfork;
use reth_chainspec::{ForkCondition, Hardforks};

/// BSC-specific hardfork activation queries, layered on top of the generic
/// [`Hardforks`] fork list the same way [`reth_chainspec::EthereumHardforks`]
/// layers Ethereum's.
pub trait BscHardforks: Hardforks {
    /// Returns the [`ForkCondition`] for the given BSC hardfork.
    fn bsc_fork_activation(&self, fork: BscHardfork) -> ForkCondition;

    fn is_ramanujan_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Ramanujan).active_at_block(block_number)
    }

    fn is_niels_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Niels).active_at_block(block_number)
    }

    fn is_mirror_sync_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::MirrorSync).active_at_block(block_number)
    }

    fn is_bruno_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Bruno).active_at_block(block_number)
    }

    fn is_euler_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Euler).active_at_block(block_number)
    }

    fn is_nano_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Nano).active_at_block(block_number)
    }

    fn is_moran_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Moran).active_at_block(block_number)
    }

    fn is_gibbs_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Gibbs).active_at_block(block_number)
    }

    fn is_planck_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Planck).active_at_block(block_number)
    }

    fn is_luban_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Luban).active_at_block(block_number)
    }

    /// True only for the block at which Luban activates (i.e. the first
    /// validator-vote-attestation-capable block, not every block after it).
    fn is_luban_transition_at_block(&self, block_number: u64) -> bool {
        self.is_luban_active_at_block(block_number) &&
            !self.is_luban_active_at_block(block_number.saturating_sub(1))
    }

    fn is_plato_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Plato).active_at_block(block_number)
    }

    fn is_hertz_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Hertz).active_at_block(block_number)
    }

    fn is_hertz_fix_active_at_block(&self, block_number: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::HertzFix).active_at_block(block_number)
    }

    fn is_kepler_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Kepler).active_at_timestamp(timestamp)
    }

    fn is_feynman_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Feynman).active_at_timestamp(timestamp)
    }

    /// True only for the block whose timestamp crosses the Feynman boundary,
    /// used to gate the one-off breathe-block validator-election-info fetch.
    fn is_feynman_transition_at_timestamp(&self, timestamp: u64, parent_timestamp: u64) -> bool {
        self.is_feynman_active_at_timestamp(timestamp) &&
            !self.is_feynman_active_at_timestamp(parent_timestamp)
    }

    fn is_feynman_fix_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::FeynmanFix).active_at_timestamp(timestamp)
    }

    fn is_haber_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Haber).active_at_timestamp(timestamp)
    }

    fn is_haber_fix_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::HaberFix).active_at_timestamp(timestamp)
    }

    fn is_bohr_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Bohr).active_at_timestamp(timestamp)
    }

    fn is_tycho_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Tycho).active_at_timestamp(timestamp)
    }

    fn is_pascal_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Pascal).active_at_timestamp(timestamp)
    }

    fn is_lorentz_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Lorentz).active_at_timestamp(timestamp)
    }

    fn is_maxwell_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.bsc_fork_activation(BscHardfork::Maxwell).active_at_timestamp(timestamp)
    }
}
