// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Chain Gas Aggregator
//!
//! Fans out over every configured chain, fetching the current fee level
//! with the fee model that chain uses, and caches the aggregate result set
//! for a short freshness window.
//!
//! ## Failure isolation
//!
//! A failure fetching one chain never affects any other chain: every cycle
//! produces exactly one [`ChainGasResult`] per configured chain, in
//! configuration order, with failures carried as error strings on that
//! chain's entry. Failed entries are cached along with successful ones so a
//! known-broken endpoint is not hammered every cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, warn};

use crate::cache::TimedCache;
use crate::config::EnvResolver;

use super::types::{ChainConfig, ChainGasResult, ChainKind};
use super::{evm, solana, ChainFetchError};

/// Cache key for the aggregate result set. The whole batch shares one
/// freshness window; there is no per-chain freshness.
const GAS_CACHE_KEY: &str = "all_chain_gas";

/// Per-call timeout for upstream RPC requests.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// One aggregation cycle's output: results in configuration order plus the
/// wall-clock time the cycle completed.
#[derive(Debug, Clone)]
pub struct GasSnapshot {
    /// One entry per configured chain, input order preserved.
    pub results: Vec<ChainGasResult>,
    /// When this result set was fetched.
    pub updated_at: DateTime<Utc>,
}

/// Collects current fee levels from all configured chains.
pub struct GasAggregator {
    chains: Vec<ChainConfig>,
    env: Arc<dyn EnvResolver>,
    http: Client,
    cache: TimedCache<Vec<ChainGasResult>>,
    rpc_timeout: Duration,
}

impl GasAggregator {
    /// Create an aggregator over the given ordered chain list.
    ///
    /// `http` is the shared outbound client (its timeout covers the Solana
    /// RPC calls); `ttl` bounds how long an aggregate result set is served
    /// from cache.
    pub fn new(
        chains: Vec<ChainConfig>,
        env: Arc<dyn EnvResolver>,
        http: Client,
        ttl: Duration,
    ) -> Self {
        Self {
            chains,
            env,
            http,
            cache: TimedCache::new(ttl),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
        }
    }

    /// The configured chains, in input order.
    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    /// Deduplicated price-feed identifiers across all configured chains.
    pub fn price_feed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .chains
            .iter()
            .filter_map(|config| config.price_feed_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Collect fee levels for every configured chain.
    ///
    /// Serves a cached snapshot when one is still fresh; otherwise fans out
    /// to all chains concurrently and caches the full result set, including
    /// failed entries. Never fails as a whole: per-chain errors are folded
    /// into that chain's result.
    pub async fn collect_all(&self) -> GasSnapshot {
        if let Some(entry) = self.cache.get(GAS_CACHE_KEY) {
            return GasSnapshot {
                results: entry.value,
                updated_at: entry.updated_at,
            };
        }

        let results = join_all(
            self.chains
                .iter()
                .map(|config| self.collect_chain(config)),
        )
        .await;

        let failed = results.iter().filter(|result| !result.ok).count();
        if failed > 0 {
            warn!(
                total = results.len(),
                failed, "Gas collection cycle completed with failures"
            );
        } else {
            debug!(total = results.len(), "Gas collection cycle completed");
        }

        let entry = self.cache.set(GAS_CACHE_KEY, results);
        GasSnapshot {
            results: entry.value,
            updated_at: entry.updated_at,
        }
    }

    /// Last cached snapshot regardless of freshness, if any cycle ever
    /// completed. Used by health probes and never triggers a fetch.
    pub fn peek_snapshot(&self) -> Option<GasSnapshot> {
        self.cache.peek(GAS_CACHE_KEY).map(|entry| GasSnapshot {
            results: entry.value,
            updated_at: entry.updated_at,
        })
    }

    async fn collect_chain(&self, config: &ChainConfig) -> ChainGasResult {
        let Some(rpc_url) = self.env.get(&config.rpc_env) else {
            let error = ChainFetchError::MissingEndpoint(config.rpc_env.clone());
            return ChainGasResult::failed(config, vec![error.to_string()]);
        };

        let outcome = match config.chain_type {
            ChainKind::Evm => evm::fetch_gas_price(&rpc_url, self.rpc_timeout)
                .await
                .map(|wei| ChainGasResult::evm_ok(config, wei)),
            ChainKind::Solana => solana::fetch_recent_fees(&self.http, &rpc_url)
                .await
                .map(|fees| ChainGasResult::solana_ok(config, fees)),
        };

        outcome.unwrap_or_else(|error| {
            warn!(chain = %config.name, error = %error, "Chain fee fetch failed");
            ChainGasResult::failed(config, vec![error.to_string()])
        })
    }
}
