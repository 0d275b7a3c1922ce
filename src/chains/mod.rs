// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain integration module.
//!
//! This module provides functionality for:
//! - Querying current gas prices from EVM chains (JSON-RPC `eth_gasPrice`)
//! - Querying recent prioritization fees from Solana
//! - Fanning out over all configured chains with per-chain failure isolation

pub mod aggregator;
pub mod evm;
pub mod solana;
pub mod types;

pub use aggregator::{GasAggregator, GasSnapshot};
pub use types::*;

/// Errors that can occur fetching fee data for a single chain.
///
/// These never cross the chain boundary: the aggregator renders them into
/// that chain's `errors` list and carries on with the rest of the batch.
#[derive(Debug, thiserror::Error)]
pub enum ChainFetchError {
    /// The configured RPC endpoint variable is not set.
    #[error("Missing RPC env {0}")]
    MissingEndpoint(String),

    /// Network or HTTP failure reaching the RPC endpoint.
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// The RPC endpoint responded with an unexpected or malformed payload.
    #[error("RPC protocol error: {0}")]
    Protocol(String),
}
