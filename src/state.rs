// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::chains::GasAggregator;
use crate::price::PriceService;

#[derive(Clone)]
pub struct AppState {
    pub gas: Arc<GasAggregator>,
    pub prices: Arc<PriceService>,
}

impl AppState {
    pub fn new(gas: GasAggregator, prices: PriceService) -> Self {
        Self {
            gas: Arc::new(gas),
            prices: Arc::new(prices),
        }
    }
}
