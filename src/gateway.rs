//! Gateway composition root: wires the pool, rotation controller,
//! adapters and orchestrator into one session.

use crate::address::{AddressPool, AddressState, PoolProvider, RotationController, SelectedAddress};
use crate::backend::{Backend, BackendClient};
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::event::{create_event_channel, GatewayEvent, GatewayEventsChannel, GatewayEventsSender};
use crate::evidence::{EvidenceForm, EvidenceOutcome, EvidenceSubmitter};
use crate::ledger::LedgerRegistry;
use crate::network::Network;
use crate::redirect::{LoggingRedirect, RedirectSink};
use crate::verify::{
    Orchestrator, OrchestratorConfig, SubmitOutcome, VerificationRequest, VerificationState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Builder for constructing a gateway session.
pub struct GatewayBuilder {
    config: GatewayConfig,
}

impl GatewayBuilder {
    /// Create a builder with the given configuration.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Build the gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<Gateway> {
        self.config.validate()?;
        info!(
            "Building gateway (cooldown {}ms, request timeout {}s)",
            self.config.cooldown_ms, self.config.request_timeout_secs
        );

        let (events_tx, events_rx) = create_event_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let client = reqwest::Client::builder()
            .timeout(self.config.request_timeout())
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;

        let pool = AddressPool::from_config(&self.config.pool)?;
        let provider = Arc::new(PoolProvider::new(pool));
        let rotation = RotationController::new(provider, events_tx.clone());

        let ledgers = LedgerRegistry::from_config(&self.config.ledger, client.clone());
        let backend: Arc<dyn Backend> = Arc::new(BackendClient::new(&self.config.backend, client));
        let redirect: Arc<dyn RedirectSink> = Arc::new(LoggingRedirect::new(events_tx.clone()));

        let orchestrator = Arc::new(Orchestrator::new(
            ledgers,
            Arc::clone(&backend),
            Arc::clone(&redirect),
            events_tx.clone(),
            OrchestratorConfig {
                cooldown: self.config.cooldown(),
                landing_url: self.config.backend.landing_url.clone(),
            },
        ));

        let evidence = EvidenceSubmitter::new(
            backend,
            redirect,
            events_tx.clone(),
            self.config.backend.landing_url.clone(),
        );

        Ok(Gateway {
            rotation,
            orchestrator,
            evidence,
            events_tx,
            events_rx: Some(events_rx),
            shutdown_tx,
            shutdown_rx,
        })
    }
}

/// A gateway session.
pub struct Gateway {
    rotation: RotationController,
    orchestrator: Arc<Orchestrator>,
    evidence: EvidenceSubmitter,
    events_tx: GatewayEventsSender,
    events_rx: Option<GatewayEventsChannel>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Gateway {
    /// Switch the settlement network and fetch a fresh receiving
    /// address. Returns `Ok(None)` if a newer selection superseded this
    /// one while the fetch was in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the address provider fails.
    pub async fn select_network(&self, network: Network) -> Result<Option<SelectedAddress>> {
        self.rotation.select(network).await
    }

    /// Snapshot of the address rotation state.
    #[must_use]
    pub fn address_state(&self) -> AddressState {
        self.rotation.state()
    }

    /// Current session state of the verification orchestrator.
    #[must_use]
    pub fn verification_state(&self) -> VerificationState {
        self.orchestrator.state()
    }

    /// Time until the next verification attempt is allowed, if a
    /// cooldown is active.
    #[must_use]
    pub fn remaining_cooldown(&self) -> Option<Duration> {
        self.orchestrator.remaining_cooldown()
    }

    /// Run one verification attempt against the currently selected
    /// receiving address.
    ///
    /// # Errors
    ///
    /// Returns an error if no receiving address has settled, or the
    /// settled address belongs to a different network than the request.
    pub async fn submit_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<SubmitOutcome> {
        let state = self.rotation.state();
        if state.loading {
            return Err(Error::Address(
                "Address selection still in flight".to_string(),
            ));
        }
        let Some(selected) = state.current else {
            return Err(Error::Address("No network selected yet".to_string()));
        };
        if selected.network != request.network {
            return Err(Error::Address(format!(
                "Selected address is for {}, request is for {}",
                selected.network, request.network
            )));
        }

        Ok(self.orchestrator.submit(request, &selected.address).await)
    }

    /// Submit raw evidence (hash + screenshot).
    pub async fn submit_evidence(&self, form: EvidenceForm) -> EvidenceOutcome {
        self.evidence.submit(form).await
    }

    /// Get a receiver for gateway events.
    ///
    /// Note: Can only be called once. Subsequent calls return None.
    pub fn events(&mut self) -> Option<GatewayEventsChannel> {
        self.events_rx.take()
    }

    /// Subscribe to gateway events.
    #[must_use]
    pub fn subscribe_events(&self) -> GatewayEventsChannel {
        self.events_tx.subscribe()
    }

    /// Spawn the countdown ticker: while a cooldown is armed, emits a
    /// [`GatewayEvent::CooldownTick`] once per second with the display
    /// value derived from the attempt timestamp. Runs until shutdown.
    #[must_use]
    pub fn spawn_cooldown_ticker(&self) -> tokio::task::JoinHandle<()> {
        let orchestrator = Arc::clone(&self.orchestrator);
        let events_tx = self.events_tx.clone();
        let mut shutdown_rx = self.shutdown_rx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        let remaining_secs = orchestrator.remaining_cooldown_secs();
                        if remaining_secs > 0 {
                            let _ = events_tx.send(GatewayEvent::CooldownTick { remaining_secs });
                        }
                    }
                }
            }
        })
    }

    /// Request shutdown of background tasks.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn gateway() -> Gateway {
        GatewayBuilder::new(GatewayConfig::default())
            .build()
            .expect("should build")
    }

    #[tokio::test]
    async fn test_build_with_defaults() {
        let mut gateway = gateway();
        assert!(gateway.events().is_some());
        assert!(gateway.events().is_none());
        assert_eq!(gateway.verification_state(), VerificationState::Idle);
        assert!(gateway.remaining_cooldown().is_none());
    }

    #[tokio::test]
    async fn test_select_network_publishes_pool_member() {
        let gateway = gateway();
        let selected = gateway
            .select_network(Network::Erc20)
            .await
            .expect("should select")
            .expect("should not be superseded");
        let config = GatewayConfig::default();
        assert!(config.pool.erc20.contains(&selected.address));
    }

    #[tokio::test]
    async fn test_submit_without_selection_is_an_error() {
        let gateway = gateway();
        let request = VerificationRequest {
            amount: "1".to_string(),
            platform_account: "P1".to_string(),
            payer_account: "Payer1".to_string(),
            transaction_reference: "0xabc".to_string(),
            network: Network::Erc20,
        };
        let result = gateway.submit_verification(&request).await;
        assert!(matches!(result, Err(Error::Address(_))));
    }

    #[tokio::test]
    async fn test_submit_with_mismatched_network_is_an_error() {
        let gateway = gateway();
        gateway
            .select_network(Network::Trc20)
            .await
            .expect("should select");
        let request = VerificationRequest {
            amount: "1".to_string(),
            platform_account: "P1".to_string(),
            payer_account: "Payer1".to_string(),
            transaction_reference: "0xabc".to_string(),
            network: Network::Erc20,
        };
        let result = gateway.submit_verification(&request).await;
        assert!(matches!(result, Err(Error::Address(_))));
    }

    #[tokio::test]
    async fn test_invalid_build_config_rejected() {
        let config = GatewayConfig {
            pool: crate::config::PoolConfig {
                erc20: Vec::new(),
                ..crate::config::PoolConfig::default()
            },
            ..GatewayConfig::default()
        };
        assert!(GatewayBuilder::new(config).build().is_err());
    }
}
