//! HTTP surface for the two entry points.
//!
//! - `POST /api/simulation/price-year-batch` — batch estimation
//! - `GET /api/solar-potential/jrc` — irradiance proxy

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::core::Services;
use crate::utils::error::Result;

pub const BATCH_ROUTE: &str = "/api/simulation/price-year-batch";
pub const IRRADIANCE_ROUTE: &str = "/api/solar-potential/jrc";

/// Shared, read-only across handlers.
pub type AppState = Arc<Services>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(BATCH_ROUTE, post(handlers::price_year_batch))
        .route(IRRADIANCE_ROUTE, get(handlers::solar_potential))
        .with_state(state)
}

/// Binds to `addr` and serves until the process stops.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
