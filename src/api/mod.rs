// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    chains::{ChainGasResult, ChainKind, EstimatedComputeUnits, SolanaFeeData},
    models::{ChainFeeRow, FeeEstimate, FeeReport, OperationEstimates},
    state::AppState,
};

pub mod fees;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new().route("/fees", get(fees::get_fees));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(fees::get_fees),
    components(
        schemas(
            FeeReport,
            ChainFeeRow,
            OperationEstimates,
            FeeEstimate,
            ChainGasResult,
            SolanaFeeData,
            EstimatedComputeUnits,
            ChainKind
        )
    ),
    tags(
        (name = "Fees", description = "Per-chain transaction fee estimates"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
