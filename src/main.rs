// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use relational_fees_server::{
    api::router,
    cache,
    chains::GasAggregator,
    config::{self, ProcessEnv},
    price::PriceService,
    refresher::FeeRefresher,
    state::AppState,
};

/// Timeout applied to every outbound HTTP request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    init_tracing();

    // Load the chain list once; it is immutable for the process lifetime.
    let resolver = ProcessEnv;
    let chains = config::load_chain_configs(&resolver).expect("Failed to load chain configuration");
    tracing::info!(chains = chains.len(), "Loaded chain configuration");

    let http = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    let gas = GasAggregator::new(chains, Arc::new(resolver), http.clone(), cache::DEFAULT_TTL);
    let prices = PriceService::from_env(&resolver, http, cache::DEFAULT_TTL);
    let state = AppState::new(gas, prices);

    // Background refresher keeps the caches warm between requests.
    let shutdown = CancellationToken::new();
    let refresher = FeeRefresher::new(state.gas.clone(), state.prices.clone());
    tokio::spawn(refresher.run(shutdown.clone()));

    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(%addr, "Relational Fees server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("HTTP server failed");
}

/// Resolves on ctrl-c, cancelling the background tasks before the server
/// drains its connections.
async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}
