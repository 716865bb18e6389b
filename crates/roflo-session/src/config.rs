//! # Session Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROFLO_DISPLAY_NAME=Neo                                             │
//! │     ROFLO_STARTING_BALANCE=2500                                        │
//! │     ROFLO_BRIDGE_TIMEOUT_MS=3000                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $ROFLO_CONFIG, or                                                  │
//! │     ~/.config/bank/roflobank.toml (Linux)                              │
//! │     ~/Library/Application Support/com.roflo.bank/roflobank.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     RofloUser, 1000 RC, 5000 ms                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host bridge may still override the name and balance at session
//! start; this file only decides what a session starts from.
//!
//! ## Configuration File Format
//! ```toml
//! # roflobank.toml
//! [account]
//! display_name = "RofloUser"
//! starting_balance = 1000
//!
//! [bridge]
//! timeout_ms = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use roflo_core::validation::validate_display_name;
use roflo_core::{AccountState, Coins, DEFAULT_DISPLAY_NAME, DEFAULT_STARTING_BALANCE};

use crate::error::{SessionError, SessionResult};

/// Upper bound for the bridge timeout.
const MAX_BRIDGE_TIMEOUT_MS: u64 = 60_000;

// =============================================================================
// Account Settings
// =============================================================================

/// What a fresh session's account looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(default = "default_display_name")]
    pub display_name: String,

    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

fn default_starting_balance() -> u64 {
    DEFAULT_STARTING_BALANCE
}

impl Default for AccountSettings {
    fn default() -> Self {
        AccountSettings {
            display_name: default_display_name(),
            starting_balance: default_starting_balance(),
        }
    }
}

// =============================================================================
// Bridge Settings
// =============================================================================

/// Host bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// How long to wait for the host before treating it as unavailable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for BridgeSettings {
    fn default() -> Self {
        BridgeSettings {
            timeout_ms: default_timeout_ms(),
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub account: AccountSettings,

    #[serde(default)]
    pub bridge: BridgeSettings,
}

impl SessionConfig {
    /// Loads configuration: defaults, then file, then environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`SessionConfig::load`] but falls back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> SessionResult<()> {
        validate_display_name(&self.account.display_name)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;

        if self.bridge.timeout_ms == 0 || self.bridge.timeout_ms > MAX_BRIDGE_TIMEOUT_MS {
            return Err(SessionError::InvalidConfig(format!(
                "bridge timeout_ms must be between 1 and {}, got {}",
                MAX_BRIDGE_TIMEOUT_MS, self.bridge.timeout_ms
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("ROFLO_DISPLAY_NAME") {
            debug!(display_name = %name, "Overriding display name from environment");
            self.account.display_name = name;
        }

        if let Some(balance) = var("ROFLO_STARTING_BALANCE") {
            match balance.trim().parse::<u64>() {
                Ok(b) => self.account.starting_balance = b,
                Err(_) => warn!(value = %balance, "Ignoring invalid ROFLO_STARTING_BALANCE"),
            }
        }

        if let Some(timeout) = var("ROFLO_BRIDGE_TIMEOUT_MS") {
            match timeout.trim().parse::<u64>() {
                Ok(ms) => {
                    debug!(timeout_ms = ms, "Overriding bridge timeout from environment");
                    self.bridge.timeout_ms = ms;
                }
                Err(_) => warn!(value = %timeout, "Ignoring invalid ROFLO_BRIDGE_TIMEOUT_MS"),
            }
        }
    }

    /// `$ROFLO_CONFIG`, else `roflobank.toml` in the platform config dir.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("ROFLO_CONFIG") {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("com", "roflo", "bank")
            .map(|dirs| dirs.config_dir().join("roflobank.toml"))
    }

    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_millis(self.bridge.timeout_ms)
    }

    /// The account a session starts from, before any host data.
    ///
    /// The name has already been validated by [`SessionConfig::validate`];
    /// it is trimmed again here so a hand-built config behaves the same.
    pub fn initial_state(&self) -> AccountState {
        let name = validate_display_name(&self.account.display_name)
            .unwrap_or_else(|_| DEFAULT_DISPLAY_NAME.to_string());
        AccountState::new(name, Coins::new(self.account.starting_balance))
    }
}
