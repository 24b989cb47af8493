//! Chain network. Eg. *Mainnet*.
use crate::params::Params;

/// Chain network.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Network {
    /// The production network.
    Mainnet,
    /// The test network.
    Testnet,
}

impl Default for Network {
    fn default() -> Self {
        Self::Mainnet
    }
}

impl Network {
    /// Return the short string representation of this network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }

    /// Get the consensus parameters for this network.
    pub fn params(&self) -> Params {
        Params::new(*self)
    }
}
