// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM gas price fetch via JSON-RPC.

use std::time::Duration;

use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::RpcError;

use super::ChainFetchError;

/// Fetch the current gas price from an EVM chain.
///
/// Issues a single `eth_gasPrice` call and returns the result as a decimal
/// wei string. The conversion stays on the integer representation end to
/// end; wei values can exceed f64's exact range. A hung endpoint is cut off
/// after `timeout` and reported as a transport error.
pub async fn fetch_gas_price(rpc_url: &str, timeout: Duration) -> Result<String, ChainFetchError> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e: url::ParseError| ChainFetchError::Transport(format!("invalid RPC URL: {e}")))?;

    let provider = ProviderBuilder::new().connect_http(url);

    let gas_price_wei = tokio::time::timeout(timeout, provider.get_gas_price())
        .await
        .map_err(|_| {
            ChainFetchError::Transport(format!(
                "eth_gasPrice timed out after {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| match e {
            RpcError::Transport(kind) => ChainFetchError::Transport(kind.to_string()),
            other => ChainFetchError::Protocol(other.to_string()),
        })?;

    Ok(gas_price_wei.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Spawn a throwaway JSON-RPC server answering `eth_gasPrice` with the
    /// given hex quantity. Returns its base URL.
    async fn spawn_gas_price_mock(result_hex: &'static str) -> String {
        let app = Router::new().route(
            "/",
            post(move |Json(body): Json<Value>| async move {
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": body["id"],
                    "result": result_hex,
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_and_decimalizes_gas_price() {
        // 0x4a817c800 = 20 gwei
        let url = spawn_gas_price_mock("0x4a817c800").await;
        let wei = fetch_gas_price(&url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(wei, "20000000000");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Bind then drop a listener so the port is (almost certainly) dead.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetch_gas_price(&format!("http://{addr}"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainFetchError::Transport(_)));
    }

    #[tokio::test]
    async fn invalid_url_is_a_transport_error() {
        let err = fetch_gas_price("not a url", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainFetchError::Transport(_)));
    }
}
