//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Node used when nothing else is configured.
pub const DEFAULT_RPC_URL: &str = "https://mynano.ninja/api/node";

/// Representative assigned to accounts opened by this wallet.
pub const DEFAULT_REPRESENTATIVE: &str =
    "nano_18shbirtzhmkf7166h39nowj9c9zrpufeg75bkbyoobqwf1iu3srfm9eo3pz";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AttoConfig {
    /// Ledger node connection.
    pub node: NodeConfig,

    /// Account and amount handling.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger node configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// JSON RPC endpoint URL.
    pub rpc_url: String,

    /// Connection establishment timeout in seconds.
    ///
    /// Only bounds connecting; a request may take as long as the node
    /// needs, since generating work can take minutes.
    pub connect_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            connect_timeout_secs: 10,
        }
    }
}

/// Wallet behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WalletConfig {
    /// Representative for the open block of a new account.
    pub default_representative: String,

    /// Number of raw digits in one display unit.
    pub amount_decimals: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            default_representative: DEFAULT_REPRESENTATIVE.to_string(),
            amount_decimals: 27,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
