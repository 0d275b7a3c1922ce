// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana prioritization fee fetch.
//!
//! Solana transactions pay a fixed base fee per signature plus an optional
//! priority fee bid per compute unit. `getRecentPrioritizationFees` returns
//! per-slot samples of recently paid priority rates; this module condenses
//! them into a single representative rate (the median of non-zero samples)
//! alongside the fixed base fee and compute-unit estimates for the
//! reference operations.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::types::{EstimatedComputeUnits, SolanaFeeData};
use super::ChainFetchError;

/// Base fee charged per transaction signature, in lamports.
pub const BASE_FEE_PER_SIG_LAMPORTS: u64 = 5_000;

/// Estimated compute units for the reference operations.
pub const ESTIMATED_CU: EstimatedComputeUnits = EstimatedComputeUnits {
    transfer: 300,
    token_transfer: 5_000,
    token_mint: 5_000,
    token_burn: 5_000,
};

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Vec<PrioritizationFeeSample>>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrioritizationFeeSample {
    prioritization_fee: u64,
}

/// Fetch recent prioritization fees and condense them into [`SolanaFeeData`].
///
/// Zero usable samples is not an error: an idle cluster legitimately reports
/// no priority fees, and the result carries a median of 0.
pub async fn fetch_recent_fees(
    http: &Client,
    rpc_url: &str,
) -> Result<SolanaFeeData, ChainFetchError> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getRecentPrioritizationFees",
        "params": [],
    });

    let response = http
        .post(rpc_url)
        .json(&body)
        .send()
        .await
        .map_err(|e| ChainFetchError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ChainFetchError::Transport(format!(
            "Solana RPC failed: {}",
            response.status()
        )));
    }

    let envelope: RpcEnvelope = response
        .json()
        .await
        .map_err(|e| ChainFetchError::Protocol(e.to_string()))?;

    if let Some(error) = envelope.error {
        return Err(ChainFetchError::Protocol(format!(
            "RPC error {}: {}",
            error.code, error.message
        )));
    }

    let mut fees: Vec<u64> = envelope
        .result
        .unwrap_or_default()
        .into_iter()
        .map(|sample| sample.prioritization_fee)
        .filter(|fee| *fee > 0)
        .collect();
    fees.sort_unstable();

    Ok(SolanaFeeData {
        base_fee_per_sig_lamports: BASE_FEE_PER_SIG_LAMPORTS,
        median_priority_micro_lamports_per_cu: median(&fees),
        estimated_cu: ESTIMATED_CU,
    })
}

/// Upper median of an already-sorted sample set; 0 when empty.
fn median(sorted: &[u64]) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    sorted[sorted.len() / 2]
}
