// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Response data structures for the fee report endpoint. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! A [`FeeReport`] bundles everything a presentation layer needs to render
//! the fee table without further I/O: the raw per-chain fee data, the USD
//! price quotes, and fee estimates already computed for each reference
//! operation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::chains::ChainGasResult;

// =============================================================================
// Fee Estimates
// =============================================================================

/// Cost of one operation on one chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct FeeEstimate {
    /// Fee in the chain's native currency.
    pub native: f64,
    /// Fee in USD; absent when no USD price is known for the chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd: Option<f64>,
}

/// Computed estimates for the reference operations on one chain.
///
/// EVM chains meter the operations in gas; Solana meters them in compute
/// units. `custom` uses the caller-supplied (or default) amount of the
/// chain's own execution metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct OperationEstimates {
    /// Native currency transfer.
    pub transfer: FeeEstimate,
    /// Token transfer (ERC-20 / SPL).
    pub token_transfer: FeeEstimate,
    /// Token mint.
    pub token_mint: FeeEstimate,
    /// Token burn.
    pub token_burn: FeeEstimate,
    /// User-supplied custom operation.
    pub custom: FeeEstimate,
}

// =============================================================================
// Fee Report
// =============================================================================

/// One row of the fee table: a chain's raw fetch result plus computed
/// estimates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainFeeRow {
    /// Raw per-chain fee data for this cycle.
    pub chain: ChainGasResult,
    /// Computed per-operation estimates; absent when the fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimates: Option<OperationEstimates>,
}

/// Full fee report returned by `GET /v1/fees`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeeReport {
    /// USD price per price-feed identifier.
    pub prices: HashMap<String, f64>,
    /// Oldest of the price and gas fetch timestamps.
    pub updated_at: DateTime<Utc>,
    /// Whether the price quote came from cache (fresh or stale).
    pub using_cached_price: bool,
    /// One row per configured chain, configuration order preserved.
    pub chains: Vec<ChainFeeRow>,
}
