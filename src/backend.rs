//! Phase 2 adapter: the authoritative payment backend.

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::network::Network;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

/// Verification payload POSTed to the backend confirmation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationPayload {
    /// Transfer amount, as entered by the payer.
    pub amount: String,
    /// The payer's account on the merchant platform.
    pub platform_account: String,
    /// The payer's sending account/wallet.
    pub payer_account: String,
    /// On-chain transaction reference.
    pub hash: String,
    /// Settlement network.
    pub network: Network,
    /// Receiving address the transfer was sent to.
    pub receiving_address: String,
}

/// Raw-evidence upload sent as a multipart form.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    /// On-chain transaction reference.
    pub hash: String,
    /// Settlement network.
    pub network: Network,
    /// Screenshot file name.
    pub file_name: String,
    /// Screenshot MIME type.
    pub content_type: String,
    /// Screenshot contents.
    pub body: Bytes,
}

/// The payment backend: accepts confirmations and evidence uploads.
///
/// One attempt per call; a 2xx response is an accept, anything else a
/// typed error.
#[async_trait]
pub trait Backend: Send + Sync {
    /// POST a verification payload for authoritative confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-2xx response or transport failure.
    async fn confirm(&self, payload: &ConfirmationPayload) -> Result<()>;

    /// POST a raw-evidence upload (hash + screenshot).
    ///
    /// # Errors
    ///
    /// Returns an error on a non-2xx response or transport failure.
    async fn upload_evidence(&self, upload: EvidenceUpload) -> Result<()>;
}

/// HTTP implementation of [`Backend`].
pub struct BackendClient {
    confirm_url: String,
    evidence_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Create a client against the configured backend endpoints.
    #[must_use]
    pub fn new(config: &BackendConfig, client: reqwest::Client) -> Self {
        Self {
            confirm_url: config.confirm_url.clone(),
            evidence_url: config.evidence_url.clone(),
            client,
        }
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn confirm(&self, payload: &ConfirmationPayload) -> Result<()> {
        debug!("Submitting confirmation payload to {}", self.confirm_url);

        let response = self
            .client
            .post(&self.confirm_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Backend confirmation request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Backend(format!(
                "Confirmation rejected with {status}"
            )))
        }
    }

    async fn upload_evidence(&self, upload: EvidenceUpload) -> Result<()> {
        debug!("Uploading evidence to {}", self.evidence_url);

        let screenshot = reqwest::multipart::Part::stream(reqwest::Body::from(upload.body))
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| Error::Config(format!("Invalid screenshot MIME type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("hash", upload.hash)
            .text("network", upload.network.as_str())
            .part("screenshot", screenshot);

        let response = self
            .client
            .post(&self.evidence_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Evidence upload request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Backend(format!(
                "Evidence upload rejected with {status}"
            )))
        }
    }
}
