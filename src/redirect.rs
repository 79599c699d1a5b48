//! Success redirect hook.
//!
//! An accepted submission ends in a full navigation to the merchant
//! landing URL. The navigation itself belongs to the host UI; the
//! gateway drives it through this sink so the side effect is observable
//! and mockable.

use crate::event::{GatewayEvent, GatewayEventsSender};
use tracing::info;

/// Receives the exactly-once redirect after an accepted submission.
pub trait RedirectSink: Send + Sync {
    /// Request navigation to `url`.
    fn redirect(&self, url: &str);
}

/// Default sink: logs the redirect and emits a [`GatewayEvent`].
pub struct LoggingRedirect {
    events: GatewayEventsSender,
}

impl LoggingRedirect {
    /// Create a sink emitting on the given event channel.
    #[must_use]
    pub fn new(events: GatewayEventsSender) -> Self {
        Self { events }
    }
}

impl RedirectSink for LoggingRedirect {
    fn redirect(&self, url: &str) {
        info!("Redirecting to {url}");
        let _ = self.events.send(GatewayEvent::Redirected {
            url: url.to_string(),
        });
    }
}
