//! Configuration for the paygate gateway.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Per-network receiving address pools.
    #[serde(default)]
    pub pool: PoolConfig,

    /// Public ledger lookup endpoints.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Payment backend endpoints.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Minimum spacing between the start of successive verification
    /// attempts, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Timeout applied to every outbound HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Per-network receiving address pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// TRC20 candidate addresses.
    #[serde(default = "default_trc20_pool")]
    pub trc20: Vec<String>,

    /// ERC20 candidate addresses.
    #[serde(default = "default_erc20_pool")]
    pub erc20: Vec<String>,
}

/// Public ledger lookup endpoints, one per network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// TRC20 explorer endpoint; the transaction reference is passed as
    /// a `hash` query parameter.
    #[serde(default = "default_trc20_endpoint")]
    pub trc20_endpoint: String,

    /// ERC20 node endpoint, probed as-is.
    #[serde(default = "default_erc20_endpoint")]
    pub erc20_endpoint: String,
}

/// Payment backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Verification confirmation endpoint (JSON POST).
    #[serde(default = "default_confirm_url")]
    pub confirm_url: String,

    /// Raw-evidence upload endpoint (multipart POST).
    #[serde(default = "default_evidence_url")]
    pub evidence_url: String,

    /// Merchant landing URL redirected to after an accepted submission.
    #[serde(default = "default_landing_url")]
    pub landing_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            ledger: LedgerConfig::default(),
            backend: BackendConfig::default(),
            cooldown_ms: default_cooldown_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            trc20: default_trc20_pool(),
            erc20: default_erc20_pool(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            trc20_endpoint: default_trc20_endpoint(),
            erc20_endpoint: default_erc20_endpoint(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            confirm_url: default_confirm_url(),
            evidence_url: default_evidence_url(),
            landing_url: default_landing_url(),
        }
    }
}

fn default_trc20_pool() -> Vec<String> {
    vec!["TPvkTpwGfMXHw7rr6qpZYSjV62Ez58hWrz".to_string()]
}

fn default_erc20_pool() -> Vec<String> {
    vec![
        "0xebC8d3Da74d5Cf995870E24b545b098713C95511".to_string(),
        "0xF7C8dA79da4CB294C4f55DFeBB1B404E3E38d921".to_string(),
    ]
}

fn default_trc20_endpoint() -> String {
    "https://apilist.tronscan.org/api/transaction-info".to_string()
}

fn default_erc20_endpoint() -> String {
    "https://mainnet.infura.io/v3/ed20ce37eca04afe85d62bd1e3c54b6d".to_string()
}

fn default_confirm_url() -> String {
    "https://moda.boutique/check/call".to_string()
}

fn default_evidence_url() -> String {
    "https://moda.boutique/check/payment.php".to_string()
}

fn default_landing_url() -> String {
    "https://moda.boutique/".to_string()
}

const fn default_cooldown_ms() -> u64 {
    10_000
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default configuration file location for this platform.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "paygate")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The cooldown window as a [`Duration`].
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any network has an empty address pool.
    pub fn validate(&self) -> crate::Result<()> {
        if self.pool.trc20.is_empty() {
            return Err(crate::Error::Config("Empty TRC20 address pool".to_string()));
        }
        if self.pool.erc20.is_empty() {
            return Err(crate::Error::Config("Empty ERC20 address pool".to_string()));
        }
        Ok(())
    }
}
