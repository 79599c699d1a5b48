//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use paygate::config::GatewayConfig;
use paygate::network::Network;
use std::path::PathBuf;

/// Headless crypto payment gateway client.
#[derive(Parser, Debug)]
#[command(name = "paygate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settlement network.
    #[arg(long, short, value_enum, default_value = "trc20", env = "PAYGATE_NETWORK")]
    pub network: CliNetwork,

    /// Transfer amount, for verification.
    #[arg(long, env = "PAYGATE_AMOUNT")]
    pub amount: Option<String>,

    /// Platform account, for verification.
    #[arg(long, env = "PAYGATE_PLATFORM_ACCOUNT")]
    pub platform_account: Option<String>,

    /// Payer account, for verification.
    #[arg(long, env = "PAYGATE_PAYER_ACCOUNT")]
    pub payer_account: Option<String>,

    /// On-chain transaction reference (hash).
    #[arg(long, env = "PAYGATE_TX_HASH")]
    pub tx_hash: Option<String>,

    /// Screenshot path for the raw-evidence upload path.
    #[arg(long)]
    pub evidence_screenshot: Option<PathBuf>,

    /// Cooldown window override, in milliseconds.
    #[arg(long, env = "PAYGATE_COOLDOWN_MS")]
    pub cooldown_ms: Option<u64>,

    /// Log level.
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Path to configuration file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// Settlement network CLI enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliNetwork {
    /// USDT on Tron.
    Trc20,
    /// USDT on Ethereum.
    Erc20,
}

impl Cli {
    /// Convert CLI arguments into a `GatewayConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn into_config(&self) -> color_eyre::Result<GatewayConfig> {
        // Start from an explicit file, the platform default location,
        // or built-in defaults.
        let mut config = if let Some(ref path) = self.config {
            GatewayConfig::from_file(path)?
        } else if let Some(path) = GatewayConfig::default_path().filter(|p| p.exists()) {
            GatewayConfig::from_file(&path)?
        } else {
            GatewayConfig::default()
        };

        // Override with CLI arguments
        config.log_level = self.log_level.clone();
        if let Some(cooldown_ms) = self.cooldown_ms {
            config.cooldown_ms = cooldown_ms;
        }

        Ok(config)
    }
}

impl From<CliNetwork> for Network {
    fn from(n: CliNetwork) -> Self {
        match n {
            CliNetwork::Trc20 => Self::Trc20,
            CliNetwork::Erc20 => Self::Erc20,
        }
    }
}
