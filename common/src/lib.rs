//! Library of common chain functionality shared by all crates.
#![warn(missing_docs)]
pub mod block;
pub mod network;
pub mod params;

pub use bitcoin;
pub use num_bigint;
