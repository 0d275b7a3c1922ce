// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fee report endpoint.
//!
//! Composes the gas aggregator and price service into one response: the
//! two fetches run concurrently, then per-chain fee estimates are computed
//! for the reference operations so clients render the table without doing
//! any fee math themselves.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::chains::{ChainGasResult, ChainKind, SolanaFeeData};
use crate::error::ApiError;
use crate::fees;
use crate::models::{ChainFeeRow, FeeEstimate, FeeReport, OperationEstimates};
use crate::state::AppState;

/// Gas used by a native transfer.
const TRANSFER_GAS: u64 = 21_000;
/// Gas used by a typical ERC-20 transfer.
const TOKEN_TRANSFER_GAS: u64 = 50_000;
/// Gas used by a typical ERC-20 mint.
const TOKEN_MINT_GAS: u64 = 36_500;
/// Gas used by a typical ERC-20 burn.
const TOKEN_BURN_GAS: u64 = 36_500;
/// Default execution units for the custom operation.
const DEFAULT_CUSTOM_UNITS: u64 = 100_000;

/// Query parameters for the fee report.
#[derive(Debug, Deserialize, IntoParams)]
pub struct FeeQuery {
    /// Execution units for the custom operation: gas on EVM chains,
    /// compute units on Solana. Defaults to 100000.
    pub custom_gas: Option<u64>,
}

/// Fee report endpoint handler.
///
/// Fails with 502 only when no price data of any age is available; every
/// fee column needs a price. Per-chain fetch failures are carried inside
/// the report instead.
#[utoipa::path(
    get,
    path = "/v1/fees",
    tag = "Fees",
    params(FeeQuery),
    responses(
        (status = 200, description = "Current fee report", body = FeeReport),
        (status = 502, description = "Price oracle unavailable and no cached prices exist")
    )
)]
pub async fn get_fees(
    State(state): State<AppState>,
    Query(query): Query<FeeQuery>,
) -> Result<Json<FeeReport>, ApiError> {
    let feed_ids = state.gas.price_feed_ids();

    let (price, gas) = tokio::join!(
        state.prices.resolve_prices(&feed_ids),
        state.gas.collect_all()
    );
    let price = price.map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    let custom_units = query.custom_gas.unwrap_or(DEFAULT_CUSTOM_UNITS);
    let chains = gas
        .results
        .into_iter()
        .map(|result| build_row(result, &price.prices, custom_units))
        .collect();

    Ok(Json(FeeReport {
        updated_at: price.updated_at.min(gas.updated_at),
        using_cached_price: price.from_cache,
        prices: price.prices,
        chains,
    }))
}

/// Build one report row: resolve the chain's USD price and compute the
/// per-operation estimates.
fn build_row(
    chain: ChainGasResult,
    prices: &HashMap<String, f64>,
    custom_units: u64,
) -> ChainFeeRow {
    // A USD-pegged gas token prices its native unit at exactly 1 USD.
    let native_usd = if chain.usd_stablecoin {
        Some(1.0)
    } else {
        chain
            .price_feed_id
            .as_deref()
            .and_then(|id| prices.get(id))
            .copied()
    };

    let estimates = if !chain.ok {
        None
    } else {
        match chain.chain_type {
            ChainKind::Evm => Some(evm_estimates(&chain.gas_price_wei, native_usd, custom_units)),
            ChainKind::Solana => chain
                .solana_fees
                .as_ref()
                .map(|data| solana_estimates(data, native_usd, custom_units)),
        }
    };

    ChainFeeRow { chain, estimates }
}

fn evm_estimate(gas_used: u64, gas_price_wei: &str, native_usd: Option<f64>) -> FeeEstimate {
    FeeEstimate {
        native: fees::native_fee_evm(gas_used, gas_price_wei),
        usd: native_usd.map(|usd| fees::usd_fee_evm(gas_used, gas_price_wei, usd)),
    }
}

fn evm_estimates(
    gas_price_wei: &str,
    native_usd: Option<f64>,
    custom_units: u64,
) -> OperationEstimates {
    OperationEstimates {
        transfer: evm_estimate(TRANSFER_GAS, gas_price_wei, native_usd),
        token_transfer: evm_estimate(TOKEN_TRANSFER_GAS, gas_price_wei, native_usd),
        token_mint: evm_estimate(TOKEN_MINT_GAS, gas_price_wei, native_usd),
        token_burn: evm_estimate(TOKEN_BURN_GAS, gas_price_wei, native_usd),
        custom: evm_estimate(custom_units, gas_price_wei, native_usd),
    }
}

fn solana_estimate(data: &SolanaFeeData, compute_units: u64, native_usd: Option<f64>) -> FeeEstimate {
    let priority = data.median_priority_micro_lamports_per_cu as f64;
    FeeEstimate {
        native: fees::native_fee_solana(data.base_fee_per_sig_lamports, priority, compute_units),
        usd: native_usd.map(|usd| {
            fees::usd_fee_solana(data.base_fee_per_sig_lamports, priority, compute_units, usd)
        }),
    }
}

fn solana_estimates(
    data: &SolanaFeeData,
    native_usd: Option<f64>,
    custom_units: u64,
) -> OperationEstimates {
    OperationEstimates {
        transfer: solana_estimate(data, data.estimated_cu.transfer, native_usd),
        token_transfer: solana_estimate(data, data.estimated_cu.token_transfer, native_usd),
        token_mint: solana_estimate(data, data.estimated_cu.token_mint, native_usd),
        token_burn: solana_estimate(data, data.estimated_cu.token_burn, native_usd),
        custom: solana_estimate(data, custom_units, native_usd),
    }
}
