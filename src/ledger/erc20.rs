//! ERC20 ledger lookup via an Ethereum node endpoint.

use crate::error::{Error, Result};
use crate::ledger::LedgerLookup;
use crate::network::Network;
use async_trait::async_trait;
use tracing::debug;

/// Probes an Ethereum node endpoint.
///
/// The probe does not key the request by transaction reference: a
/// reachable, healthy endpoint counts as Phase 1 success. A stricter
/// check would need an `eth_getTransactionByHash` JSON-RPC call.
pub struct Erc20Lookup {
    endpoint: String,
    client: reqwest::Client,
}

impl Erc20Lookup {
    /// Create an adapter against the given node endpoint.
    #[must_use]
    pub fn new(endpoint: String, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl LedgerLookup for Erc20Lookup {
    fn network(&self) -> Network {
        Network::Erc20
    }

    async fn call(&self, reference: &str) -> Result<()> {
        debug!("ERC20 ledger probe (reference {reference} not sent)");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Network(format!("ERC20 ledger request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Ledger(format!("ERC20 ledger returned {status}")))
        }
    }
}
