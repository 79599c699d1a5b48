//! Static per-network address pools and the selection provider.

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::network::Network;
use async_trait::async_trait;
use rand::seq::SliceRandom;

/// Static pool of candidate receiving addresses, one list per network.
///
/// Every network has at least one candidate; the lists are immutable
/// for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct AddressPool {
    trc20: Vec<String>,
    erc20: Vec<String>,
}

impl AddressPool {
    /// Create a pool from per-network candidate lists.
    ///
    /// # Errors
    ///
    /// Returns an error if any list is empty.
    pub fn new(trc20: Vec<String>, erc20: Vec<String>) -> Result<Self> {
        if trc20.is_empty() {
            return Err(Error::Config("Empty TRC20 address pool".to_string()));
        }
        if erc20.is_empty() {
            return Err(Error::Config("Empty ERC20 address pool".to_string()));
        }
        Ok(Self { trc20, erc20 })
    }

    /// Build a pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured list is empty.
    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        Self::new(config.trc20.clone(), config.erc20.clone())
    }

    /// Candidate addresses for a network. Never empty.
    #[must_use]
    pub fn candidates(&self, network: Network) -> &[String] {
        match network {
            Network::Trc20 => &self.trc20,
            Network::Erc20 => &self.erc20,
        }
    }
}

/// Source of receiving addresses, one selection per request.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Select a receiving address for the given network.
    ///
    /// # Errors
    ///
    /// Returns an error if no address can be produced.
    async fn select(&self, network: Network) -> Result<String>;
}

/// Provider that picks uniformly at random from a static [`AddressPool`].
pub struct PoolProvider {
    pool: AddressPool,
}

impl PoolProvider {
    /// Create a provider over the given pool.
    #[must_use]
    pub fn new(pool: AddressPool) -> Self {
        Self { pool }
    }

    /// Pick one candidate uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool for the network is empty, which the
    /// pool constructor rules out.
    pub fn pick(&self, network: Network) -> Result<String> {
        self.pool
            .candidates(network)
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| Error::Address(format!("Empty address pool for {network}")))
    }
}

#[async_trait]
impl AddressProvider for PoolProvider {
    async fn select(&self, network: Network) -> Result<String> {
        self.pick(network)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_pool() -> AddressPool {
        AddressPool::new(
            vec!["T1".to_string()],
            vec!["0xA".to_string(), "0xB".to_string()],
        )
        .expect("should build")
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(AddressPool::new(Vec::new(), vec!["0xA".to_string()]).is_err());
        assert!(AddressPool::new(vec!["T1".to_string()], Vec::new()).is_err());
    }

    #[test]
    fn test_candidates_non_empty_for_all_networks() {
        let pool = test_pool();
        for network in Network::ALL {
            assert!(!pool.candidates(network).is_empty());
        }
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let provider = PoolProvider::new(test_pool());
        for _ in 0..10 {
            let address = provider.pick(Network::Trc20).expect("should pick");
            assert_eq!(address, "T1");
        }
    }

    proptest! {
        #[test]
        fn prop_selection_is_pool_member(index in 0usize..2) {
            let network = Network::ALL[index];
            let provider = PoolProvider::new(test_pool());
            let address = provider.pick(network).expect("should pick");
            prop_assert!(provider.pool.candidates(network).contains(&address));
        }
    }
}
