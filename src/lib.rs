//! Headless crypto payment gateway client.
//!
//! paygate rotates a per-network receiving address and verifies a
//! payer's on-chain transfer through a two-phase protocol: a public
//! ledger lookup followed by authoritative backend confirmation, with a
//! cooldown gate enforcing a minimum spacing between attempts. A raw
//! evidence upload (transaction hash + screenshot) is available as an
//! alternate, unverified submission path.
//!
//! Presentation (QR rendering, localisation) stays outside this crate;
//! the [`event`] channel and the [`redirect`] sink are the UI-facing
//! seams.
//!
//! # Example
//!
//! ```no_run
//! use paygate::{GatewayBuilder, GatewayConfig, Network};
//! use paygate::verify::VerificationRequest;
//!
//! # async fn run() -> paygate::Result<()> {
//! let gateway = GatewayBuilder::new(GatewayConfig::default()).build()?;
//!
//! let selected = gateway.select_network(Network::Erc20).await?;
//! println!("pay to: {:?}", selected);
//!
//! let outcome = gateway
//!     .submit_verification(&VerificationRequest {
//!         amount: "10.5".to_string(),
//!         platform_account: "P1".to_string(),
//!         payer_account: "Payer1".to_string(),
//!         transaction_reference: "0xabc".to_string(),
//!         network: Network::Erc20,
//!     })
//!     .await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod evidence;
pub mod gateway;
pub mod ledger;
pub mod network;
pub mod redirect;
pub mod verify;

pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use gateway::{Gateway, GatewayBuilder};
pub use network::Network;
pub use verify::{SubmitOutcome, VerificationRequest, VerificationState};
