//! Payer-supplied verification request and its local validation.

use crate::network::Network;
use std::fmt;

/// Payer-supplied fields for one verification attempt.
///
/// Constructed fresh per submission; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Transfer amount, a non-negative decimal entered as text.
    pub amount: String,
    /// The payer's account on the merchant platform.
    pub platform_account: String,
    /// The payer's sending account/wallet.
    pub payer_account: String,
    /// On-chain transaction reference.
    pub transaction_reference: String,
    /// Settlement network of the transfer.
    pub network: Network,
}

/// A field-level validation error. Resolved locally, never reaches the
/// network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "is required".to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl VerificationRequest {
    /// Validate all fields. An empty result means the request may be
    /// submitted.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.amount.trim().is_empty() {
            errors.push(FieldError::required("amount"));
        } else {
            match self.amount.trim().parse::<f64>() {
                Ok(value) if value >= 0.0 && value.is_finite() => {}
                Ok(_) => errors.push(FieldError {
                    field: "amount",
                    message: "must not be negative".to_string(),
                }),
                Err(_) => errors.push(FieldError {
                    field: "amount",
                    message: "must be a number".to_string(),
                }),
            }
        }

        if self.platform_account.trim().is_empty() {
            errors.push(FieldError::required("platform_account"));
        }
        if self.payer_account.trim().is_empty() {
            errors.push(FieldError::required("payer_account"));
        }
        if self.transaction_reference.trim().is_empty() {
            errors.push(FieldError::required("transaction_reference"));
        }

        errors
    }
}
