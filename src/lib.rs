// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Fees - Multi-Chain Transaction Cost Service
//!
//! This crate polls a configured set of EVM and Solana chains for their
//! current fee levels, resolves USD prices for the native currencies, and
//! serves per-operation fee estimates over HTTP.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `cache` - TTL cache with stale-read fallback
//! - `chains` - Per-chain fee fetching and aggregation
//! - `fees` - Pure fee arithmetic
//! - `price` - USD price resolution
//! - `refresher` - Background cache refresh task

pub mod api;
pub mod cache;
pub mod chains;
pub mod config;
pub mod error;
pub mod fees;
pub mod models;
pub mod price;
pub mod refresher;
pub mod state;
