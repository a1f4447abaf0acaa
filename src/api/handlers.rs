//! Request handlers for the API endpoints.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::{ErrorResponse, SolarPotentialQuery};
use super::AppState;
use crate::core::BatchError;

/// `POST /api/simulation/price-year-batch`
///
/// 200 + id → result/error mapping, or 400 + `{ error, status }` when the
/// body has no `simulations` array (including bodies that are not JSON).
pub async fn price_year_batch(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(&body) else {
        tracing::debug!("Batch body is not valid JSON");
        return batch_error(BatchError::InvalidFormat);
    };

    match state.batch.run(&body).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => batch_error(e),
    }
}

fn batch_error(err: BatchError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(err.to_body())).into_response()
}

/// `GET /api/solar-potential/jrc?lat=..&lon=..[&angle=..&aspect=..]`
///
/// Provider JSON unchanged on success; 400 on validation; 500 on upstream failure.
pub async fn solar_potential(
    State(state): State<AppState>,
    Query(query): Query<SolarPotentialQuery>,
) -> Response {
    match state.irradiance.fetch(&query.into()).await {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
