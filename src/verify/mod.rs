//! Transaction verification orchestrator.
//!
//! One verification attempt is a two-phase protocol:
//!
//! ```text
//! submit(request)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ Field validation    │──invalid──▶ field errors (no I/O)
//! └─────────┬───────────┘
//!           ▼
//! ┌─────────────────────┐
//! │ Cooldown gate       │──active───▶ rejected, remaining time
//! └─────────┬───────────┘
//!           ▼ (cooldown armed)
//! ┌─────────────────────┐
//! │ Phase 1: ledger     │──failure──▶ Failed (no Phase 2)
//! └─────────┬───────────┘
//!           ▼
//! ┌─────────────────────┐
//! │ Phase 2: backend    │──failure──▶ Failed
//! └─────────┬───────────┘
//!           ▼
//!       Succeeded ──▶ one redirect to the landing URL
//! ```

mod orchestrator;
mod request;

pub use orchestrator::{
    FailureReason, Orchestrator, OrchestratorConfig, SubmitOutcome, VerificationState,
    DEFAULT_COOLDOWN,
};
pub use request::{FieldError, VerificationRequest};
