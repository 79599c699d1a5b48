//! Raw-evidence submission: the file-upload alternative to verification.
//!
//! Collects a transaction reference and a screenshot, validates them
//! locally, and submits once as a multipart upload. No cooldown, no
//! two-phase protocol.

use crate::backend::{Backend, EvidenceUpload};
use crate::event::{GatewayEvent, GatewayEventsSender};
use crate::network::Network;
use crate::redirect::RedirectSink;
use crate::verify::FieldError;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum accepted screenshot size: 5 MiB.
pub const MAX_SCREENSHOT_BYTES: usize = 5 * 1024 * 1024;

/// A payer-provided screenshot.
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Original file name.
    pub file_name: String,
    /// MIME type; must be an image type.
    pub content_type: String,
    /// File contents.
    pub bytes: Bytes,
}

/// The raw-evidence form.
#[derive(Debug, Clone)]
pub struct EvidenceForm {
    /// On-chain transaction reference.
    pub transaction_reference: String,
    /// Settlement network.
    pub network: Network,
    /// Screenshot of the transfer.
    pub screenshot: Screenshot,
}

impl EvidenceForm {
    /// Validate the form. An empty result means it may be submitted.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.transaction_reference.trim().is_empty() {
            errors.push(FieldError {
                field: "transaction_reference",
                message: "is required".to_string(),
            });
        }

        if self.screenshot.bytes.is_empty() {
            errors.push(FieldError {
                field: "screenshot",
                message: "is required".to_string(),
            });
        } else if self.screenshot.bytes.len() > MAX_SCREENSHOT_BYTES {
            errors.push(FieldError {
                field: "screenshot",
                message: "exceeds the 5 MiB limit".to_string(),
            });
        } else if !self.screenshot.content_type.starts_with("image/") {
            errors.push(FieldError {
                field: "screenshot",
                message: "must be an image".to_string(),
            });
        }

        errors
    }
}

/// Outcome of one evidence submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceOutcome {
    /// The upload was accepted; the redirect has fired.
    Accepted,
    /// Local validation failed; no I/O was performed.
    Invalid(Vec<FieldError>),
    /// The backend rejected the upload or was unreachable.
    Failed,
}

/// Submits raw evidence to the backend, once per call.
pub struct EvidenceSubmitter {
    backend: Arc<dyn Backend>,
    redirect: Arc<dyn RedirectSink>,
    events: GatewayEventsSender,
    landing_url: String,
}

impl EvidenceSubmitter {
    /// Create a submitter over the given backend.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        redirect: Arc<dyn RedirectSink>,
        events: GatewayEventsSender,
        landing_url: String,
    ) -> Self {
        Self {
            backend,
            redirect,
            events,
            landing_url,
        }
    }

    /// Validate and submit the form.
    pub async fn submit(&self, form: EvidenceForm) -> EvidenceOutcome {
        let errors = form.validate();
        if !errors.is_empty() {
            debug!("Evidence blocked by validation: {} error(s)", errors.len());
            return EvidenceOutcome::Invalid(errors);
        }

        let upload = EvidenceUpload {
            hash: form.transaction_reference,
            network: form.network,
            file_name: form.screenshot.file_name,
            content_type: form.screenshot.content_type,
            body: form.screenshot.bytes,
        };

        match self.backend.upload_evidence(upload).await {
            Ok(()) => {
                info!("Evidence accepted");
                let _ = self.events.send(GatewayEvent::EvidenceAccepted);
                self.redirect.redirect(&self.landing_url);
                EvidenceOutcome::Accepted
            }
            Err(e) => {
                warn!("Evidence submission failed: {e}");
                EvidenceOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backend::ConfirmationPayload;
    use crate::error::{Error, Result};
    use crate::event::create_event_channel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockBackend {
        uploads: AtomicUsize,
        succeed: bool,
    }

    #[async_trait]
    impl Backend for MockBackend {
        async fn confirm(&self, _payload: &ConfirmationPayload) -> Result<()> {
            Ok(())
        }

        async fn upload_evidence(&self, _upload: EvidenceUpload) -> Result<()> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(())
            } else {
                Err(Error::Backend("rejected".to_string()))
            }
        }
    }

    #[derive(Default)]
    struct CountingRedirect {
        redirects: AtomicUsize,
    }

    impl RedirectSink for CountingRedirect {
        fn redirect(&self, _url: &str) {
            self.redirects.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn submitter(succeed: bool) -> (EvidenceSubmitter, Arc<MockBackend>, Arc<CountingRedirect>) {
        let backend = Arc::new(MockBackend {
            succeed,
            ..MockBackend::default()
        });
        let redirect = Arc::new(CountingRedirect::default());
        let (events_tx, _events_rx) = create_event_channel();
        let submitter = EvidenceSubmitter::new(
            Arc::clone(&backend) as Arc<dyn Backend>,
            Arc::clone(&redirect) as Arc<dyn RedirectSink>,
            events_tx,
            "https://moda.boutique/".to_string(),
        );
        (submitter, backend, redirect)
    }

    fn form() -> EvidenceForm {
        EvidenceForm {
            transaction_reference: "0xabc".to_string(),
            network: Network::Trc20,
            screenshot: Screenshot {
                file_name: "proof.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: Bytes::from_static(&[0x89, 0x50, 0x4e, 0x47]),
            },
        }
    }

    #[tokio::test]
    async fn test_accepted_upload_redirects_once() {
        let (submitter, backend, redirect) = submitter(true);
        let outcome = submitter.submit(form()).await;
        assert_eq!(outcome, EvidenceOutcome::Accepted);
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(redirect.redirects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_upload_does_not_redirect() {
        let (submitter, backend, redirect) = submitter(false);
        let outcome = submitter.submit(form()).await;
        assert_eq!(outcome, EvidenceOutcome::Failed);
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(redirect.redirects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_reference_blocks_upload() {
        let (submitter, backend, _redirect) = submitter(true);
        let mut bad = form();
        bad.transaction_reference = String::new();
        let outcome = submitter.submit(bad).await;
        assert!(matches!(outcome, EvidenceOutcome::Invalid(ref e) if e.len() == 1));
        assert_eq!(backend.uploads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_oversized_screenshot_rejected() {
        let mut bad = form();
        bad.screenshot.bytes = Bytes::from(vec![0u8; MAX_SCREENSHOT_BYTES + 1]);
        let errors = bad.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "screenshot");
    }

    #[test]
    fn test_non_image_screenshot_rejected() {
        let mut bad = form();
        bad.screenshot.content_type = "application/pdf".to_string();
        let errors = bad.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "must be an image");
    }

    #[test]
    fn test_screenshot_at_limit_accepted() {
        let mut form = form();
        form.screenshot.bytes = Bytes::from(vec![0u8; MAX_SCREENSHOT_BYTES]);
        assert!(form.validate().is_empty());
    }
}
