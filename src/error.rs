//! Error types for paygate.

/// Errors returned by gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network transport error (timeout, connection failure, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// The public ledger reported the transaction as unknown or invalid.
    #[error("Ledger lookup failed: {0}")]
    Ledger(String),

    /// The payment backend rejected the submission.
    #[error("Backend rejected: {0}")]
    Backend(String),

    /// No usable receiving address for the requested operation.
    #[error("No receiving address available: {0}")]
    Address(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;
