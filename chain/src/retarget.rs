//! Difficulty retargeting for the hybrid proof-of-work/proof-of-stake
//! chain.
//!
//! The required target for a block is derived from the timestamps of
//! the previous two blocks *of the same kind*: work blocks retarget
//! against work blocks, stake blocks against stake blocks. The result
//! is a damped moving average: each block pulls the target towards the
//! actual spacing, weighted against the nominal spacing over a one-week
//! window.
//!
//! Missing history is never an error here. The engine degrades to fixed
//! bootstrap targets for the earliest blocks of each kind, and always
//! produces a compact target.
use num_integer::Integer;

use peercore_common::block::store::ChainStore;
use peercore_common::block::{target, Bits, BlockRef, Target};
use peercore_common::params::Params;

/// Find the most recent block of the given kind, starting at `from` and
/// walking the parent links.
///
/// Returns `from` itself if it already matches. Returns `None` at the
/// genesis block, which by convention is not linked into the retarget
/// lookup chain, and `None` if a parent the store claims to know cannot
/// actually be fetched.
pub fn last_block_of_kind<'a, S: ChainStore>(
    store: &'a S,
    from: &'a BlockRef,
    proof_of_stake: bool,
) -> Option<&'a BlockRef> {
    let mut block = from;
    loop {
        if block.height == 0 {
            return None;
        }
        // An unknown parent means the walk can't continue; the current
        // block is the best answer available.
        if !store.contains(&block.prev_blockhash) {
            return Some(block);
        }
        if block.proof_of_stake == proof_of_stake {
            return Some(block);
        }
        block = store.get_block(&block.prev_blockhash)?;
    }
}

/// Compute the compact target required of the next block of the given
/// kind, following `last`.
pub fn next_target_required<S: ChainStore>(
    params: &Params,
    store: &S,
    last: Option<&BlockRef>,
    proof_of_stake: bool,
) -> Bits {
    let last = match last {
        Some(block) => block,
        None => return params.pow_limit_bits, // genesis block
    };
    let prev = match last_block_of_kind(store, last, proof_of_stake) {
        Some(block) => block,
        None => return params.initial_hash_target_bits, // first block of this kind
    };
    let prev_prev = match store
        .get_block(&prev.prev_blockhash)
        .and_then(|block| last_block_of_kind(store, block, proof_of_stake))
    {
        Some(block) => block,
        None => return params.initial_hash_target_bits, // second block of this kind
    };

    // May be negative; out-of-order timestamps are not rejected here.
    let actual_spacing = prev.time as i64 - prev_prev.time as i64;
    let target_spacing = if proof_of_stake {
        params.stake_target_spacing
    } else {
        // Work spacing stretches with the number of blocks of the other
        // kind mined in between, up to twelve times the base spacing.
        i64::min(
            params.work_target_spacing_max,
            params.stake_target_spacing * (1 + last.height as i64 - prev.height as i64),
        )
    };
    let interval = params.target_timespan / target_spacing;

    // The actual spacing enters with weight 2 against the nominal
    // spacing's (interval - 1). Floor division: the divisor is positive,
    // while the multiplier can go negative.
    let mut new_target = target::target_from_compact(prev.bits);
    new_target *= target_spacing * (interval - 1) + 2 * actual_spacing;
    new_target = new_target.div_floor(&Target::from(target_spacing * (interval + 1)));

    if new_target > params.pow_limit {
        new_target = params.pow_limit.clone();
    }
    target::compact_from_target(&new_target)
}
