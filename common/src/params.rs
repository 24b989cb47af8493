//! Consensus parameters.
use crate::block::{Bits, Target};
use crate::network::Network;

/// Compact target required while there is no previous block at all.
pub const POW_LIMIT_BITS: Bits = 0x1d00ffff;

/// Compact target required of the first two blocks of each kind, before
/// there is enough same-kind history to retarget against.
pub const INITIAL_HASH_TARGET_BITS: Bits = 0x1c00ffff;

/// Parameters that influence chain consensus.
///
/// Passed explicitly wherever they are needed, so that multiple
/// parameter sets can coexist in one process, eg. in tests.
#[derive(Debug, Clone)]
pub struct Params {
    /// The network these parameters apply to.
    pub network: Network,
    /// The easiest allowed proof-of-work target. Retarget results are
    /// clamped to this, never raised above it.
    pub pow_limit: Target,
    /// Compact target required at the genesis boundary.
    pub pow_limit_bits: Bits,
    /// Compact target required of the first two blocks of a kind.
    pub initial_hash_target_bits: Bits,
    /// Nominal spacing between proof-of-stake blocks, in seconds.
    pub stake_target_spacing: i64,
    /// Upper bound on the adaptive proof-of-work spacing, in seconds.
    pub work_target_spacing_max: i64,
    /// Averaging window of the retarget filter, in seconds.
    pub target_timespan: i64,
}

impl Params {
    /// Creates parameters set to the values specified by `network`.
    ///
    /// Both networks currently share the same consensus values; they
    /// differ only in the chain they apply to.
    pub fn new(network: Network) -> Self {
        Self {
            network,
            // 2^224 - 1.
            pow_limit: (Target::from(1u8) << 224) - 1,
            pow_limit_bits: POW_LIMIT_BITS,
            initial_hash_target_bits: INITIAL_HASH_TARGET_BITS,
            stake_target_spacing: 10 * 60,
            work_target_spacing_max: 12 * 10 * 60,
            target_timespan: 7 * 24 * 60 * 60,
        }
    }
}
