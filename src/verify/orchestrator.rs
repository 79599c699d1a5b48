//! The verification state machine and cooldown gate.

use crate::backend::{Backend, ConfirmationPayload};
use crate::event::{GatewayEvent, GatewayEventsSender};
use crate::ledger::LedgerRegistry;
use crate::redirect::RedirectSink;
use crate::verify::request::{FieldError, VerificationRequest};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default minimum spacing between the start of successive attempts.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Which phase of an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Phase 1: the public ledger was unreachable or rejected the
    /// reference.
    Ledger,
    /// Phase 2: the payment backend rejected the confirmation.
    Backend,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger => f.write_str("ledger unreachable or invalid"),
            Self::Backend => f.write_str("backend rejected"),
        }
    }
}

/// Session state of the orchestrator.
///
/// `Failed` gates like `Idle`: a new attempt is allowed once the
/// cooldown clears. `Succeeded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationState {
    /// No attempt in flight.
    #[default]
    Idle,
    /// An attempt is in flight; further submits are ignored.
    Verifying,
    /// An attempt was accepted; the session is done.
    Succeeded,
    /// The most recent attempt failed.
    Failed(FailureReason),
}

/// Outcome of one [`Orchestrator::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Both phases accepted; the redirect has fired.
    Succeeded,
    /// Local field validation failed; no I/O was performed.
    Invalid(Vec<FieldError>),
    /// The cooldown gate rejected the attempt; no I/O was performed.
    CoolingDown {
        /// Time until the next attempt is allowed.
        remaining: Duration,
    },
    /// One of the two phases failed.
    Failed(FailureReason),
    /// An attempt was already in flight or the session already
    /// succeeded; this call was a no-op.
    Ignored,
}

impl SubmitOutcome {
    /// Returns true if the attempt was accepted end to end.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns true if the call reached the network phases.
    #[must_use]
    pub fn was_attempted(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Minimum spacing between the start of successive attempts.
    pub cooldown: Duration,
    /// Merchant landing URL for the success redirect.
    pub landing_url: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            landing_url: "https://moda.boutique/".to_string(),
        }
    }
}

struct Session {
    state: VerificationState,
    last_attempt_start: Option<Instant>,
}

/// The transaction verification orchestrator.
///
/// Owns the cooldown clock, input validation, two-phase call sequencing
/// and the session state machine. State and timestamp are single-writer;
/// the displayed countdown is derived from the timestamp, never counted
/// down independently.
pub struct Orchestrator {
    ledgers: LedgerRegistry,
    backend: Arc<dyn Backend>,
    redirect: Arc<dyn RedirectSink>,
    events: GatewayEventsSender,
    config: OrchestratorConfig,
    session: Mutex<Session>,
}

impl Orchestrator {
    /// Create an orchestrator over the given adapters.
    #[must_use]
    pub fn new(
        ledgers: LedgerRegistry,
        backend: Arc<dyn Backend>,
        redirect: Arc<dyn RedirectSink>,
        events: GatewayEventsSender,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            ledgers,
            backend,
            redirect,
            events,
            config,
            session: Mutex::new(Session {
                state: VerificationState::default(),
                last_attempt_start: None,
            }),
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> VerificationState {
        self.session.lock().state
    }

    /// Time until the cooldown gate opens, or `None` when no cooldown
    /// is active. Derived from the stored attempt timestamp on every
    /// call, so it stays correct across suspension and resume.
    #[must_use]
    pub fn remaining_cooldown(&self) -> Option<Duration> {
        let session = self.session.lock();
        session.last_attempt_start.and_then(|start| {
            let elapsed = start.elapsed();
            (elapsed < self.config.cooldown).then(|| self.config.cooldown - elapsed)
        })
    }

    /// Remaining cooldown in whole seconds, rounded up for display.
    /// Zero when no cooldown is active.
    #[must_use]
    pub fn remaining_cooldown_secs(&self) -> u64 {
        self.remaining_cooldown().map_or(0, display_seconds)
    }

    /// Run one verification attempt.
    ///
    /// `receiving_address` is the currently selected receiving address;
    /// it is appended to the Phase 2 payload.
    pub async fn submit(
        &self,
        request: &VerificationRequest,
        receiving_address: &str,
    ) -> SubmitOutcome {
        let field_errors = request.validate();
        if !field_errors.is_empty() {
            debug!("Submit blocked by validation: {} error(s)", field_errors.len());
            return SubmitOutcome::Invalid(field_errors);
        }

        // Re-entrancy check, cooldown gate and arming are one atomic
        // step: the gate compares timestamps, and the timestamp is set
        // before any phase runs so a failing attempt still spaces the
        // next one.
        let now = Instant::now();
        {
            let mut session = self.session.lock();
            match session.state {
                VerificationState::Verifying | VerificationState::Succeeded => {
                    debug!("Submit ignored in state {:?}", session.state);
                    return SubmitOutcome::Ignored;
                }
                VerificationState::Idle | VerificationState::Failed(_) => {}
            }

            if let Some(start) = session.last_attempt_start {
                let elapsed = now.duration_since(start);
                if elapsed < self.config.cooldown {
                    let remaining = self.config.cooldown - elapsed;
                    debug!("Submit rejected by cooldown, {remaining:?} remaining");
                    let _ = self.events.send(GatewayEvent::CooldownRejected {
                        remaining_ms: u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX),
                    });
                    return SubmitOutcome::CoolingDown { remaining };
                }
            }

            session.last_attempt_start = Some(now);
            session.state = VerificationState::Verifying;
        }

        info!("Verification attempt started for {}", request.network);
        let _ = self.events.send(GatewayEvent::VerificationStarted {
            network: request.network,
        });

        let result = self.run_phases(request, receiving_address).await;

        match result {
            Ok(()) => {
                self.session.lock().state = VerificationState::Succeeded;
                info!("Verification succeeded for {}", request.network);
                let _ = self.events.send(GatewayEvent::VerificationSucceeded {
                    network: request.network,
                });
                self.redirect.redirect(&self.config.landing_url);
                SubmitOutcome::Succeeded
            }
            Err(reason) => {
                self.session.lock().state = VerificationState::Failed(reason);
                warn!("Verification failed: {reason}");
                let _ = self.events.send(GatewayEvent::VerificationFailed {
                    reason: reason.to_string(),
                });
                SubmitOutcome::Failed(reason)
            }
        }
    }

    /// Phase 1 then Phase 2, strictly in order. Phase 2 never starts
    /// unless Phase 1 settled successfully. All adapter errors collapse
    /// to a [`FailureReason`]; the detail goes to the log only.
    async fn run_phases(
        &self,
        request: &VerificationRequest,
        receiving_address: &str,
    ) -> Result<(), FailureReason> {
        let Some(ledger) = self.ledgers.get(request.network) else {
            warn!("No ledger lookup registered for {}", request.network);
            return Err(FailureReason::Ledger);
        };

        if let Err(e) = ledger.call(&request.transaction_reference).await {
            warn!("Phase 1 failed: {e}");
            return Err(FailureReason::Ledger);
        }
        debug!("Phase 1 succeeded for {}", request.network);

        let payload = ConfirmationPayload {
            amount: request.amount.clone(),
            platform_account: request.platform_account.clone(),
            payer_account: request.payer_account.clone(),
            hash: request.transaction_reference.clone(),
            network: request.network,
            receiving_address: receiving_address.to_string(),
        };

        if let Err(e) = self.backend.confirm(&payload).await {
            warn!("Phase 2 failed: {e}");
            return Err(FailureReason::Backend);
        }
        debug!("Phase 2 succeeded for {}", request.network);

        Ok(())
    }
}

/// Round a remaining duration up to whole seconds for display.
#[must_use]
pub(crate) fn display_seconds(remaining: Duration) -> u64 {
    u64::try_from(remaining.as_millis().div_ceil(1000)).unwrap_or(u64::MAX)
}
