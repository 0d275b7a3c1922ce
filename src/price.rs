// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Price Service
//!
//! Resolves current USD prices for the configured price-feed identifiers
//! from an external price oracle (CoinGecko-compatible `simple/price`
//! endpoint). All requested identifiers are fetched in one batched call and
//! cached together under a single key.
//!
//! ## Degradation
//!
//! When the oracle is unreachable or answers with an error status, the
//! service falls back to the last cached quote of any age, tagged
//! `from_cache`. Only when no cached data exists at all does the failure
//! propagate; every fee computation downstream needs a price, so that is a
//! hard failure for the whole response.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::cache::TimedCache;
use crate::config::{EnvResolver, PRICE_API_BASE_URL_ENV};

/// Public CoinGecko v3 API, used when `PRICE_API_BASE_URL` is not set.
pub const DEFAULT_PRICE_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// All prices are fetched and cached together under this key.
const PRICE_CACHE_KEY: &str = "token_prices_usd";

/// Errors resolving USD prices.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    /// Network/HTTP failure reaching the oracle, with no cached fallback.
    #[error("price fetch failed: {0}")]
    FetchFailed(String),

    /// The oracle response body did not match the expected shape.
    #[error("price response was invalid: {0}")]
    InvalidResponse(String),

    /// A syntactically valid response carried no usable price. Treated as
    /// a failure so downstream fees are never silently computed as zero.
    #[error("price response contained no valid prices")]
    NoValidPrices,
}

/// USD prices for a set of price-feed identifiers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceQuote {
    /// Price-feed identifier to USD price. Only finite positive prices.
    pub prices: HashMap<String, f64>,
    /// When this quote was fetched from the oracle.
    pub updated_at: DateTime<Utc>,
    /// Whether this quote was served from cache (fresh or stale).
    pub from_cache: bool,
}

#[derive(Debug, Deserialize)]
struct VsCurrencyPrices {
    usd: Option<f64>,
}

/// Batched USD price lookup with caching and stale fallback.
pub struct PriceService {
    http: Client,
    base_url: String,
    cache: TimedCache<HashMap<String, f64>>,
}

impl PriceService {
    /// Create a service against the given oracle base URL.
    pub fn new(http: Client, base_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            cache: TimedCache::new(ttl),
        }
    }

    /// Create a service with the base URL from `PRICE_API_BASE_URL`, or the
    /// public CoinGecko default.
    pub fn from_env(env: &dyn EnvResolver, http: Client, ttl: Duration) -> Self {
        let base_url = env
            .get(PRICE_API_BASE_URL_ENV)
            .unwrap_or_else(|| DEFAULT_PRICE_API_BASE_URL.to_string());
        Self::new(http, base_url, ttl)
    }

    /// Resolve current USD prices for the given price-feed identifiers.
    ///
    /// Identifiers are deduplicated; the whole set is fetched in one call
    /// and cached together. Identifiers whose price is missing, zero,
    /// negative or non-finite are silently dropped from the result.
    pub async fn resolve_prices(&self, ids: &[String]) -> Result<PriceQuote, PriceError> {
        if let Some(entry) = self.cache.get(PRICE_CACHE_KEY) {
            return Ok(PriceQuote {
                prices: entry.value,
                updated_at: entry.updated_at,
                from_cache: true,
            });
        }

        let deduped: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        let joined = deduped.into_iter().collect::<Vec<_>>().join(",");
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, joined
        );

        let response = match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                return self.stale_or(PriceError::FetchFailed(format!(
                    "price API returned {}",
                    response.status()
                )));
            }
            Err(e) => return self.stale_or(PriceError::FetchFailed(e.to_string())),
        };

        let parsed: HashMap<String, VsCurrencyPrices> = response
            .json()
            .await
            .map_err(|e| PriceError::InvalidResponse(e.to_string()))?;

        let prices: HashMap<String, f64> = parsed
            .into_iter()
            .filter_map(|(id, entry)| {
                entry
                    .usd
                    .filter(|price| price.is_finite() && *price > 0.0)
                    .map(|price| (id, price))
            })
            .collect();

        if prices.is_empty() {
            return Err(PriceError::NoValidPrices);
        }

        let entry = self.cache.set(PRICE_CACHE_KEY, prices);
        Ok(PriceQuote {
            prices: entry.value,
            updated_at: entry.updated_at,
            from_cache: false,
        })
    }

    /// Last cached quote regardless of freshness, if any fetch ever
    /// succeeded. Used by health probes and never triggers a fetch.
    pub fn peek_quote(&self) -> Option<PriceQuote> {
        self.cache.peek(PRICE_CACHE_KEY).map(|entry| PriceQuote {
            prices: entry.value,
            updated_at: entry.updated_at,
            from_cache: true,
        })
    }

    /// Serve a possibly-stale cached quote, or surface `error` if the
    /// cache has never been filled.
    fn stale_or(&self, error: PriceError) -> Result<PriceQuote, PriceError> {
        match self.cache.peek(PRICE_CACHE_KEY) {
            Some(entry) => {
                warn!(error = %error, "Price fetch failed, serving stale cached prices");
                Ok(PriceQuote {
                    prices: entry.value,
                    updated_at: entry.updated_at,
                    from_cache: true,
                })
            }
            None => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::{routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct MockOracle {
        body: Arc<Value>,
        hits: Arc<AtomicUsize>,
        failing: Arc<AtomicBool>,
    }

    /// Spawn a price oracle mock serving `body` on `/simple/price`.
    ///
    /// Flipping `failing` makes it answer 500 instead.
    async fn spawn_oracle(body: Value) -> (String, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let oracle = MockOracle {
            body: Arc::new(body),
            hits: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        };
        let (hits, failing) = (oracle.hits.clone(), oracle.failing.clone());

        let app = Router::new()
            .route(
                "/simple/price",
                get(|State(oracle): State<MockOracle>| async move {
                    oracle.hits.fetch_add(1, Ordering::SeqCst);
                    if oracle.failing.load(Ordering::SeqCst) {
                        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
                    } else {
                        (StatusCode::OK, Json(oracle.body.as_ref().clone()))
                    }
                }),
            )
            .with_state(oracle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), hits, failing)
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn fetches_and_caches_prices() {
        let (url, hits, _) = spawn_oracle(json!({
            "ethereum": { "usd": 4000.0 },
            "solana": { "usd": 200.0 },
        }))
        .await;
        let service = PriceService::new(Client::new(), url, Duration::from_secs(300));

        let first = service
            .resolve_prices(&ids(&["ethereum", "solana", "ethereum"]))
            .await
            .unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.prices["ethereum"], 4000.0);
        assert_eq!(first.prices["solana"], 200.0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let second = service.resolve_prices(&ids(&["ethereum"])).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.updated_at, first.updated_at);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn falls_back_to_stale_prices_when_oracle_fails() {
        let (url, _, failing) = spawn_oracle(json!({ "ethereum": { "usd": 4000.0 } })).await;
        let service = PriceService::new(Client::new(), url, Duration::from_millis(1));

        let fresh = service.resolve_prices(&ids(&["ethereum"])).await.unwrap();
        assert!(!fresh.from_cache);

        // Let the entry expire, then break the oracle.
        tokio::time::sleep(Duration::from_millis(5)).await;
        failing.store(true, Ordering::SeqCst);

        let stale = service.resolve_prices(&ids(&["ethereum"])).await.unwrap();
        assert!(stale.from_cache);
        assert_eq!(stale.prices["ethereum"], 4000.0);
        assert_eq!(stale.updated_at, fresh.updated_at);
    }

    #[tokio::test]
    async fn failure_with_empty_cache_is_an_error() {
        let (url, _, failing) = spawn_oracle(json!({})).await;
        failing.store(true, Ordering::SeqCst);
        let service = PriceService::new(Client::new(), url, Duration::from_secs(300));

        let err = service.resolve_prices(&ids(&["ethereum"])).await.unwrap_err();
        assert!(matches!(err, PriceError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn invalid_entries_are_dropped() {
        let (url, _, _) = spawn_oracle(json!({
            "ethereum": { "usd": 4000.0 },
            "zero": { "usd": 0.0 },
            "negative": { "usd": -1.0 },
            "missing": {},
        }))
        .await;
        let service = PriceService::new(Client::new(), url, Duration::from_secs(300));

        let quote = service
            .resolve_prices(&ids(&["ethereum", "zero", "negative", "missing"]))
            .await
            .unwrap();

        assert_eq!(quote.prices.len(), 1);
        assert_eq!(quote.prices["ethereum"], 4000.0);
    }

    #[tokio::test]
    async fn all_invalid_entries_is_no_valid_prices() {
        let (url, _, _) = spawn_oracle(json!({
            "zero": { "usd": 0.0 },
            "missing": {},
        }))
        .await;
        let service = PriceService::new(Client::new(), url, Duration::from_secs(300));

        let err = service.resolve_prices(&ids(&["zero", "missing"])).await.unwrap_err();
        assert!(matches!(err, PriceError::NoValidPrices));
    }

    #[tokio::test]
    async fn unparseable_body_is_invalid_response() {
        let (url, _, _) = spawn_oracle(json!([1, 2, 3])).await;
        let service = PriceService::new(Client::new(), url, Duration::from_secs(300));

        let err = service.resolve_prices(&ids(&["ethereum"])).await.unwrap_err();
        assert!(matches!(err, PriceError::InvalidResponse(_)));
    }
}
