//! Rotation controller: owns the currently selected receiving address.

use crate::address::pool::AddressProvider;
use crate::error::Result;
use crate::event::{GatewayEvent, GatewayEventsSender};
use crate::network::Network;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// The receiving address currently presented to the payer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAddress {
    /// Network the address belongs to.
    pub network: Network,
    /// The receiving address.
    pub address: String,
}

/// Snapshot of the rotation state.
#[derive(Debug, Clone, Default)]
pub struct AddressState {
    /// The last published selection, if any.
    pub current: Option<SelectedAddress>,
    /// A fetch is in flight; `current` must not be rendered as fresh.
    pub loading: bool,
    /// The most recent fetch failed; `current` is the previous address.
    pub failed: bool,
}

struct Inner {
    generation: u64,
    state: AddressState,
}

/// Fetches a fresh receiving address on every network change.
///
/// Results are published by request generation: if the network changes
/// again before a fetch settles, the stale result is discarded and
/// never overwrites the newer selection.
pub struct RotationController {
    provider: Arc<dyn AddressProvider>,
    inner: Arc<Mutex<Inner>>,
    events: GatewayEventsSender,
}

impl RotationController {
    /// Create a controller over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn AddressProvider>, events: GatewayEventsSender) -> Self {
        Self {
            provider,
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                state: AddressState::default(),
            })),
            events,
        }
    }

    /// Fetch and publish a fresh address for `network`.
    ///
    /// Returns `Ok(None)` if this request was superseded by a newer one
    /// while in flight; the superseding request owns the published
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails. The previous address (if
    /// any) stays published with the loading flag cleared and the
    /// failed flag set.
    pub async fn select(&self, network: Network) -> Result<Option<SelectedAddress>> {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.failed = false;
            inner.generation
        };
        let _ = self.events.send(GatewayEvent::AddressRotating { network });

        let fetched = self.provider.select(network).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            debug!(
                "Discarding stale address fetch for {network} (generation {generation} superseded)"
            );
            return Ok(None);
        }

        match fetched {
            Ok(address) => {
                let selected = SelectedAddress { network, address };
                inner.state = AddressState {
                    current: Some(selected.clone()),
                    loading: false,
                    failed: false,
                };
                debug!("Published receiving address for {network}");
                let _ = self.events.send(GatewayEvent::AddressRotated {
                    network,
                    address: selected.address.clone(),
                });
                Ok(Some(selected))
            }
            Err(e) => {
                inner.state.loading = false;
                inner.state.failed = true;
                warn!("Address rotation failed for {network}: {e}");
                let _ = self.events.send(GatewayEvent::AddressRotationFailed {
                    network,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Snapshot of the current rotation state.
    #[must_use]
    pub fn state(&self) -> AddressState {
        self.inner.lock().state.clone()
    }

    /// The settled selection, or `None` while a fetch is in flight.
    #[must_use]
    pub fn current(&self) -> Option<SelectedAddress> {
        let inner = self.inner.lock();
        if inner.state.loading {
            None
        } else {
            inner.state.current.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::event::create_event_channel;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Provider whose fetch latency depends on the network, so tests
    /// can make an older request settle after a newer one.
    struct SlowProvider {
        trc20_delay: Duration,
        erc20_delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl AddressProvider for SlowProvider {
        async fn select(&self, network: Network) -> Result<String> {
            let delay = match network {
                Network::Trc20 => self.trc20_delay,
                Network::Erc20 => self.erc20_delay,
            };
            tokio::time::sleep(delay).await;
            if self.fail {
                return Err(Error::Network("provider offline".to_string()));
            }
            Ok(format!("addr-{network}"))
        }
    }

    fn controller(provider: SlowProvider) -> RotationController {
        let (events_tx, _events_rx) = create_event_channel();
        RotationController::new(Arc::new(provider), events_tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_publishes_address() {
        let controller = controller(SlowProvider {
            trc20_delay: Duration::from_millis(10),
            erc20_delay: Duration::from_millis(10),
            fail: false,
        });

        let selected = controller
            .select(Network::Trc20)
            .await
            .expect("should select")
            .expect("should not be superseded");
        assert_eq!(selected.network, Network::Trc20);
        assert_eq!(selected.address, "addr-TRC20");

        let state = controller.state();
        assert!(!state.loading);
        assert!(!state.failed);
        assert_eq!(controller.current(), Some(selected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_never_overwrites_newer_selection() {
        let controller = Arc::new(controller(SlowProvider {
            trc20_delay: Duration::from_millis(500),
            erc20_delay: Duration::from_millis(5),
            fail: false,
        }));

        // First request (slow), superseded before it settles.
        let slow = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.select(Network::Trc20).await })
        };
        tokio::task::yield_now().await;

        // Second request (fast) settles first and owns the state.
        let selected = controller
            .select(Network::Erc20)
            .await
            .expect("should select")
            .expect("should not be superseded");
        assert_eq!(selected.network, Network::Erc20);

        // The slow result arrives late and must be discarded.
        let stale = slow.await.expect("task").expect("should not error");
        assert_eq!(stale, None);

        let current = controller.current().expect("should have address");
        assert_eq!(current.network, Network::Erc20);
        assert_eq!(current.address, "addr-ERC20");
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_hides_previous_address() {
        let controller = Arc::new(controller(SlowProvider {
            trc20_delay: Duration::from_millis(5),
            erc20_delay: Duration::from_millis(500),
            fail: false,
        }));

        controller
            .select(Network::Trc20)
            .await
            .expect("should select");
        assert!(controller.current().is_some());

        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.select(Network::Erc20).await })
        };
        tokio::task::yield_now().await;

        // While the fetch is in flight the old address is stale.
        assert!(controller.state().loading);
        assert_eq!(controller.current(), None);

        pending.await.expect("task").expect("should select");
        assert!(!controller.state().loading);
    }

    /// Provider that succeeds on the first call and fails afterwards.
    struct FlakyProvider {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl AddressProvider for FlakyProvider {
        async fn select(&self, network: Network) -> Result<String> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call == 0 {
                Ok(format!("addr-{network}"))
            } else {
                Err(Error::Network("provider offline".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_address() {
        let (events_tx, _events_rx) = create_event_channel();
        let controller = RotationController::new(
            Arc::new(FlakyProvider {
                calls: std::sync::atomic::AtomicUsize::new(0),
            }),
            events_tx,
        );

        controller
            .select(Network::Trc20)
            .await
            .expect("first fetch should succeed");
        let previous = controller.current().expect("should have address");

        let result = controller.select(Network::Erc20).await;
        assert!(result.is_err());

        // Previous address stays published, loading cleared, failure flagged.
        let state = controller.state();
        assert!(!state.loading);
        assert!(state.failed);
        assert_eq!(state.current, Some(previous));
    }
}
