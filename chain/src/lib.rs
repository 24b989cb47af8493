//! Difficulty retargeting and chain-index loading, with a generic
//! storage backend.
//!
//! *Consensus-critical: the retarget arithmetic must match the rest of
//! the network bit-for-bit.*
#![warn(missing_docs)]
pub mod index;
pub mod retarget;
pub mod store;
