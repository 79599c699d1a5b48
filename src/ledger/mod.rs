//! Phase 1 adapters: public ledger lookups, one variant per network.
//!
//! Each adapter makes exactly one attempt per call; any non-2xx status
//! or transport failure surfaces as a typed error. Retry policy belongs
//! to the caller (the orchestrator never retries).

mod erc20;
mod trc20;

pub use erc20::Erc20Lookup;
pub use trc20::Trc20Lookup;

use crate::config::LedgerConfig;
use crate::error::Result;
use crate::network::Network;
use async_trait::async_trait;
use std::collections::HashMap;

/// A ledger lookup variant for one network.
#[async_trait]
pub trait LedgerLookup: Send + Sync {
    /// The network this variant serves.
    fn network(&self) -> Network;

    /// Check the transaction reference against the public ledger.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success response or transport failure.
    async fn call(&self, reference: &str) -> Result<()>;
}

/// Lookup table from [`Network`] to its ledger adapter.
#[derive(Default)]
pub struct LedgerRegistry {
    lookups: HashMap<Network, Box<dyn LedgerLookup>>,
}

impl LedgerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own network.
    pub fn register(&mut self, lookup: Box<dyn LedgerLookup>) {
        self.lookups.insert(lookup.network(), lookup);
    }

    /// Build the registry with the standard adapters for every network.
    #[must_use]
    pub fn from_config(config: &LedgerConfig, client: reqwest::Client) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Trc20Lookup::new(
            config.trc20_endpoint.clone(),
            client.clone(),
        )));
        registry.register(Box::new(Erc20Lookup::new(
            config.erc20_endpoint.clone(),
            client,
        )));
        registry
    }

    /// The adapter for a network, if registered.
    #[must_use]
    pub fn get(&self, network: Network) -> Option<&dyn LedgerLookup> {
        self.lookups.get(&network).map(AsRef::as_ref)
    }
}
