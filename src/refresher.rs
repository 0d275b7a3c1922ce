// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Fee Refresher
//!
//! Background task that periodically refreshes the gas snapshot and price
//! quote so the caches stay warm and API requests are served without
//! waiting on upstream RPCs.
//!
//! ## Strategy
//!
//! Every `poll_interval` (default 10 s, matching the cache TTL) the
//! refresher:
//! 1. Runs a full gas collection cycle; per-chain failures are already
//!    folded into the snapshot and only logged here.
//! 2. Resolves USD prices for all configured price feeds. A total price
//!    failure is logged and retried on the next sweep; the price service
//!    keeps serving stale data to requests in the meantime.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown,
//! following the same pattern as the HTTP server task.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chains::GasAggregator;
use crate::price::PriceService;

/// Default interval between refresh sweeps.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Background refresher keeping the gas and price caches warm.
pub struct FeeRefresher {
    gas: Arc<GasAggregator>,
    prices: Arc<PriceService>,
    poll_interval: Duration,
}

impl FeeRefresher {
    /// Create a new refresher over the shared service handles.
    pub fn new(gas: Arc<GasAggregator>, prices: Arc<PriceService>) -> Self {
        Self {
            gas,
            prices,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Run the refresh loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(refresher.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "Fee refresher starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Fee refresher shutting down");
                return;
            }

            self.refresh_step().await;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Fee refresher shutting down");
                    return;
                }
            }
        }
    }

    /// Execute one refresh sweep: gas snapshot first, then prices.
    async fn refresh_step(&self) {
        let snapshot = self.gas.collect_all().await;
        let failed = snapshot.results.iter().filter(|result| !result.ok).count();
        if failed > 0 {
            warn!(
                chains = snapshot.results.len(),
                failed, "Fee refresher: gas snapshot refreshed with failures"
            );
        } else {
            debug!(
                chains = snapshot.results.len(),
                "Fee refresher: gas snapshot refreshed"
            );
        }

        let feed_ids = self.gas.price_feed_ids();
        match self.prices.resolve_prices(&feed_ids).await {
            Ok(quote) => {
                debug!(
                    prices = quote.prices.len(),
                    from_cache = quote.from_cache,
                    "Fee refresher: price quote refreshed"
                );
            }
            Err(e) => {
                warn!(error = %e, "Fee refresher: price fetch failed");
            }
        }
    }
}
