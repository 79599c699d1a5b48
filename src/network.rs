//! Supported settlement networks.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported settlement network.
///
/// The set is closed: each variant determines which address pool subset
/// and which ledger lookup variant apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    /// USDT on Tron (TRC20).
    #[default]
    Trc20,
    /// USDT on Ethereum (ERC20).
    Erc20,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Self; 2] = [Self::Trc20, Self::Erc20];

    /// Wire name of the network, as used in backend payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trc20 => "TRC20",
            Self::Erc20 => "ERC20",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRC20" => Ok(Self::Trc20),
            "ERC20" => Ok(Self::Erc20),
            other => Err(Error::Config(format!("Unknown network: {other}"))),
        }
    }
}
