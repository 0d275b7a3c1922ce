// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain configuration and per-cycle gas result types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fee model discriminator for a configured chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// EVM-compatible chain: single gas price in wei.
    Evm,
    /// Solana: base fee per signature plus per-CU priority rate.
    Solana,
}

/// Static descriptor of one monitored chain.
///
/// Loaded once at startup (from `CHAINS_FILE` or the built-in defaults) and
/// never mutated. The RPC endpoint itself is not part of the config; only
/// the name of the environment variable that holds it, so deployments can
/// swap providers without touching the chain list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainConfig {
    /// Display name, e.g. "Ethereum".
    pub name: String,
    /// Numeric chain identifier (EVM chain id; 101 for Solana mainnet-beta).
    pub chain_id: u64,
    /// Environment variable naming this chain's RPC endpoint URL.
    pub rpc_env: String,
    /// Native currency symbol, e.g. "ETH".
    pub native_currency: String,
    /// Whether the native currency is a USD-pegged stablecoin.
    #[serde(default)]
    pub usd_stablecoin: bool,
    /// Whether this is a test network.
    #[serde(default)]
    pub testnet: bool,
    /// Which fee model this chain uses.
    pub chain_type: ChainKind,
    /// Price-feed identifier for the native currency (e.g. CoinGecko id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_feed_id: Option<String>,
}

/// Estimated compute-unit cost of each reference operation on Solana.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct EstimatedComputeUnits {
    /// Native SOL transfer.
    pub transfer: u64,
    /// SPL token transfer.
    pub token_transfer: u64,
    /// SPL token mint.
    pub token_mint: u64,
    /// SPL token burn.
    pub token_burn: u64,
}

/// Solana fee-model payload for one aggregation cycle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SolanaFeeData {
    /// Base fee per signature, in lamports.
    pub base_fee_per_sig_lamports: u64,
    /// Median priority rate from recent slots, in micro-lamports per CU.
    pub median_priority_micro_lamports_per_cu: u64,
    /// Fixed compute-unit estimates per reference operation.
    pub estimated_cu: EstimatedComputeUnits,
}

/// One chain's outcome for one aggregation cycle.
///
/// Echoes the chain's static identity so consumers can render rows without
/// re-joining against the configuration. Exactly one fee-model payload is
/// meaningful per chain type: `gas_price_wei` for EVM chains, `solana_fees`
/// for Solana. Failed entries carry a placeholder `"0"` gas price, no
/// Solana payload, and at least one error string.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainGasResult {
    /// Chain display name.
    pub name: String,
    /// Numeric chain identifier.
    pub chain_id: u64,
    /// Current gas price in wei, as a decimal string ("0" for non-EVM).
    pub gas_price_wei: String,
    /// Whether the fetch succeeded.
    pub ok: bool,
    /// Human-readable error descriptions; empty iff `ok`.
    pub errors: Vec<String>,
    /// Native currency symbol.
    pub native_currency: String,
    /// Whether the native currency is a USD-pegged stablecoin.
    pub usd_stablecoin: bool,
    /// Whether this is a test network.
    pub testnet: bool,
    /// Which fee model this chain uses.
    pub chain_type: ChainKind,
    /// Price-feed identifier for the native currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_feed_id: Option<String>,
    /// Solana fee payload, present only for successful Solana fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solana_fees: Option<SolanaFeeData>,
}

impl ChainGasResult {
    fn base(config: &ChainConfig) -> Self {
        Self {
            name: config.name.clone(),
            chain_id: config.chain_id,
            gas_price_wei: "0".to_string(),
            ok: false,
            errors: Vec::new(),
            native_currency: config.native_currency.clone(),
            usd_stablecoin: config.usd_stablecoin,
            testnet: config.testnet,
            chain_type: config.chain_type,
            price_feed_id: config.price_feed_id.clone(),
            solana_fees: None,
        }
    }

    /// Successful EVM fetch with the gas price as a decimal wei string.
    pub fn evm_ok(config: &ChainConfig, gas_price_wei: String) -> Self {
        Self {
            gas_price_wei,
            ok: true,
            ..Self::base(config)
        }
    }

    /// Successful Solana fetch.
    pub fn solana_ok(config: &ChainConfig, fees: SolanaFeeData) -> Self {
        Self {
            ok: true,
            solana_fees: Some(fees),
            ..Self::base(config)
        }
    }

    /// Failed fetch carrying the error descriptions.
    pub fn failed(config: &ChainConfig, errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::base(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evm_config() -> ChainConfig {
        ChainConfig {
            name: "Ethereum".to_string(),
            chain_id: 1,
            rpc_env: "ETH_RPC_URL".to_string(),
            native_currency: "ETH".to_string(),
            usd_stablecoin: false,
            testnet: false,
            chain_type: ChainKind::Evm,
            price_feed_id: Some("ethereum".to_string()),
        }
    }

    #[test]
    fn evm_ok_echoes_identity() {
        let result = ChainGasResult::evm_ok(&evm_config(), "12000000000".to_string());
        assert!(result.ok);
        assert!(result.errors.is_empty());
        assert_eq!(result.name, "Ethereum");
        assert_eq!(result.chain_id, 1);
        assert_eq!(result.gas_price_wei, "12000000000");
        assert!(result.solana_fees.is_none());
    }

    #[test]
    fn failed_carries_placeholder_payload() {
        let result = ChainGasResult::failed(&evm_config(), vec!["boom".to_string()]);
        assert!(!result.ok);
        assert_eq!(result.errors, vec!["boom".to_string()]);
        assert_eq!(result.gas_price_wei, "0");
        assert!(result.solana_fees.is_none());
    }

    #[test]
    fn chain_config_deserializes_with_default_flags() {
        let config: ChainConfig = serde_json::from_str(
            r#"{
                "name": "Base",
                "chain_id": 8453,
                "rpc_env": "BASE_RPC_URL",
                "native_currency": "ETH",
                "chain_type": "evm",
                "price_feed_id": "ethereum"
            }"#,
        )
        .unwrap();
        assert!(!config.usd_stablecoin);
        assert!(!config.testnet);
        assert_eq!(config.chain_type, ChainKind::Evm);
    }

    #[test]
    fn chain_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChainKind::Solana).unwrap(), r#""solana""#);
    }
}
