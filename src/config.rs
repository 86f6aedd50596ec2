//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (keypair path, destination address) are referenced by env-var
//! name in the config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub rpc: RpcConfig,
    pub wallet: WalletConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    /// Simulate deployments instead of submitting them.
    pub dry_run: bool,
    /// Rounds to run before stopping; 0 means unlimited.
    #[serde(default)]
    pub max_rounds: u64,
    /// Seconds to wait between rounds.
    pub round_interval_secs: f64,
    /// SOL committed per chosen tile.
    pub deploy_amount_sol: Decimal,
    #[serde(default = "default_max_tiles")]
    pub max_tiles_per_round: usize,
}

fn default_max_tiles() -> usize {
    3
}

impl AgentConfig {
    /// The round bound; `None` means run until externally stopped.
    pub fn round_bound(&self) -> Option<u64> {
        if self.max_rounds == 0 {
            None
        } else {
            Some(self.max_rounds)
        }
    }

    /// Inter-round pacing, floor-clamped to zero.
    pub fn pacing(&self) -> Duration {
        Duration::from_secs_f64(self.round_interval_secs.max(0.0))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RpcConfig {
    pub url: String,
    /// Base58 address of the Ore program whose round accounts we scan.
    pub program_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    /// Env var naming the keypair file used for live deployments.
    pub keypair_path_env: String,
    /// Env var naming the deployment destination address.
    pub destination_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    pub path: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
