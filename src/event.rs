//! Gateway event system.

use crate::network::Network;
use tokio::sync::broadcast;

/// Events emitted by the gateway.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// A fresh receiving address is being fetched for a network.
    AddressRotating {
        /// Selected network.
        network: Network,
    },

    /// A fresh receiving address has been published.
    AddressRotated {
        /// Selected network.
        network: Network,
        /// The new receiving address.
        address: String,
    },

    /// Address rotation failed; the previous address (if any) remains.
    AddressRotationFailed {
        /// Selected network.
        network: Network,
        /// Failure description.
        message: String,
    },

    /// A verification attempt has started (cooldown armed).
    VerificationStarted {
        /// Network the attempt targets.
        network: Network,
    },

    /// A verification attempt failed.
    VerificationFailed {
        /// Failure description.
        reason: String,
    },

    /// A verification attempt succeeded.
    VerificationSucceeded {
        /// Network the attempt targeted.
        network: Network,
    },

    /// A verification attempt was rejected by the cooldown gate.
    CooldownRejected {
        /// Remaining cooldown in milliseconds.
        remaining_ms: u64,
    },

    /// Periodic cooldown countdown for display.
    CooldownTick {
        /// Remaining cooldown in whole seconds, rounded up.
        remaining_secs: u64,
    },

    /// A raw-evidence upload was accepted by the backend.
    EvidenceAccepted,

    /// A redirect to the merchant landing URL was requested.
    Redirected {
        /// Destination URL.
        url: String,
    },
}

/// Channel for receiving gateway events.
pub type GatewayEventsChannel = broadcast::Receiver<GatewayEvent>;

/// Sender for gateway events.
pub type GatewayEventsSender = broadcast::Sender<GatewayEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (GatewayEventsSender, GatewayEventsChannel) {
    broadcast::channel(256)
}
