// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, the environment
//! resolution capability injected into the fetching services, and chain
//! list loading. Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `CHAINS_FILE` | Path to a JSON chain list | Built-in chain set |
//! | `PRICE_API_BASE_URL` | Price oracle base URL | Public CoinGecko v3 |
//! | `<chain>.rpc_env` | RPC endpoint URL, one variable per chain (e.g. `ETH_RPC_URL`) | Unset chains report a per-chain error |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;

use crate::chains::{ChainConfig, ChainKind};

/// Environment variable naming an optional JSON file with the chain list.
pub const CHAINS_FILE_ENV: &str = "CHAINS_FILE";

/// Environment variable overriding the price oracle base URL.
pub const PRICE_API_BASE_URL_ENV: &str = "PRICE_API_BASE_URL";

/// Capability to resolve configuration keys to values.
///
/// The fetching services never read the process environment directly; they
/// go through this trait, so tests can substitute fixed maps.
pub trait EnvResolver: Send + Sync {
    /// Resolve `key` to its value. Empty values count as absent.
    fn get(&self, key: &str) -> Option<String>;
}

/// [`EnvResolver`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvResolver for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

/// [`EnvResolver`] backed by a fixed in-memory map.
///
/// Used by tests and by embedders that manage configuration themselves.
#[derive(Debug, Clone, Default)]
pub struct FixedEnv {
    values: HashMap<String, String>,
}

impl FixedEnv {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl EnvResolver for FixedEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|value| !value.is_empty()).cloned()
    }
}

/// Errors loading the chain configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read chain config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse chain config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Load the ordered chain list.
///
/// Reads the JSON file named by `CHAINS_FILE` when set, otherwise returns
/// the built-in chain set. The list order is preserved through aggregation
/// and into API responses.
pub fn load_chain_configs(env: &dyn EnvResolver) -> Result<Vec<ChainConfig>, ConfigError> {
    let Some(path) = env.get(CHAINS_FILE_ENV) else {
        return Ok(default_chains());
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.clone(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
        path,
        message: e.to_string(),
    })
}

/// Built-in chain set used when no `CHAINS_FILE` is configured.
pub fn default_chains() -> Vec<ChainConfig> {
    vec![
        ChainConfig {
            name: "Ethereum".to_string(),
            chain_id: 1,
            rpc_env: "ETH_RPC_URL".to_string(),
            native_currency: "ETH".to_string(),
            usd_stablecoin: false,
            testnet: false,
            chain_type: ChainKind::Evm,
            price_feed_id: Some("ethereum".to_string()),
        },
        ChainConfig {
            name: "Base".to_string(),
            chain_id: 8453,
            rpc_env: "BASE_RPC_URL".to_string(),
            native_currency: "ETH".to_string(),
            usd_stablecoin: false,
            testnet: false,
            chain_type: ChainKind::Evm,
            price_feed_id: Some("ethereum".to_string()),
        },
        ChainConfig {
            name: "Arbitrum One".to_string(),
            chain_id: 42161,
            rpc_env: "ARBITRUM_RPC_URL".to_string(),
            native_currency: "ETH".to_string(),
            usd_stablecoin: false,
            testnet: false,
            chain_type: ChainKind::Evm,
            price_feed_id: Some("ethereum".to_string()),
        },
        ChainConfig {
            name: "Polygon".to_string(),
            chain_id: 137,
            rpc_env: "POLYGON_RPC_URL".to_string(),
            native_currency: "POL".to_string(),
            usd_stablecoin: false,
            testnet: false,
            chain_type: ChainKind::Evm,
            price_feed_id: Some("polygon-ecosystem-token".to_string()),
        },
        ChainConfig {
            name: "Solana".to_string(),
            chain_id: 101,
            rpc_env: "SOLANA_RPC_URL".to_string(),
            native_currency: "SOL".to_string(),
            usd_stablecoin: false,
            testnet: false,
            chain_type: ChainKind::Solana,
            price_feed_id: Some("solana".to_string()),
        },
        ChainConfig {
            name: "Sepolia".to_string(),
            chain_id: 11155111,
            rpc_env: "SEPOLIA_RPC_URL".to_string(),
            native_currency: "ETH".to_string(),
            usd_stablecoin: false,
            testnet: true,
            chain_type: ChainKind::Evm,
            price_feed_id: Some("ethereum".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_env_resolves_and_filters_empty() {
        let env = FixedEnv::new()
            .with("ETH_RPC_URL", "https://rpc.example")
            .with("EMPTY", "");

        assert_eq!(env.get("ETH_RPC_URL").as_deref(), Some("https://rpc.example"));
        assert!(env.get("EMPTY").is_none());
        assert!(env.get("MISSING").is_none());
    }

    #[test]
    fn defaults_used_when_no_chains_file() {
        let chains = load_chain_configs(&FixedEnv::new()).unwrap();
        assert!(!chains.is_empty());
        assert!(chains.iter().any(|c| c.chain_type == ChainKind::Solana));
        // Order is the declaration order
        assert_eq!(chains[0].name, "Ethereum");
    }

    #[test]
    fn loads_chains_from_file() {
        let path = std::env::temp_dir().join(format!("test-chains-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{
                "name": "Testchain",
                "chain_id": 1337,
                "rpc_env": "TESTCHAIN_RPC_URL",
                "native_currency": "TST",
                "chain_type": "evm"
            }]"#,
        )
        .unwrap();

        let env = FixedEnv::new().with(CHAINS_FILE_ENV, path.to_string_lossy());
        let chains = load_chain_configs(&env).unwrap();

        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].name, "Testchain");
        assert_eq!(chains[0].chain_id, 1337);
        assert!(chains[0].price_feed_id.is_none());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let env = FixedEnv::new().with(CHAINS_FILE_ENV, "/nonexistent/chains.json");
        let err = load_chain_configs(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("test-chains-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json ]").unwrap();

        let env = FixedEnv::new().with(CHAINS_FILE_ENV, path.to_string_lossy());
        let err = load_chain_configs(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        std::fs::remove_file(&path).ok();
    }
}
