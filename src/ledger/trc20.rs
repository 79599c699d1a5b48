//! TRC20 ledger lookup via the Tronscan explorer API.

use crate::error::{Error, Result};
use crate::ledger::LedgerLookup;
use crate::network::Network;
use async_trait::async_trait;
use tracing::debug;

/// Looks a transaction up on the Tron explorer by hash.
pub struct Trc20Lookup {
    endpoint: String,
    client: reqwest::Client,
}

impl Trc20Lookup {
    /// Create an adapter against the given explorer endpoint.
    #[must_use]
    pub fn new(endpoint: String, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl LedgerLookup for Trc20Lookup {
    fn network(&self) -> Network {
        Network::Trc20
    }

    async fn call(&self, reference: &str) -> Result<()> {
        debug!("TRC20 ledger lookup for {reference}");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("hash", reference)])
            .send()
            .await
            .map_err(|e| Error::Network(format!("TRC20 ledger request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Ledger(format!(
                "TRC20 ledger returned {status} for {reference}"
            )))
        }
    }
}
