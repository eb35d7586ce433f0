use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::Result;
use crate::server::error::AppError;
use crate::server::models::{PointParams, PriceResp, RangeParams};
use crate::server::state::AppState;
use crate::types::SupportedCurrency;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_price(
    State(state): State<AppState>,
    Path(currency): Path<String>,
    params: std::result::Result<Query<PointParams>, QueryRejection>,
) -> std::result::Result<Json<PriceResp>, AppError> {
    let Query(params) = params?;
    let currency: SupportedCurrency = currency.parse()?;
    debug!("Point lookup {} at {}", currency, params.uts);

    let facade = state.facade;
    let quote = tokio::task::spawn_blocking(move || facade.point_lookup(currency, params.uts))
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))??;

    Ok(Json(PriceResp::from(quote)))
}

pub async fn get_price_range(
    State(state): State<AppState>,
    Path(currency): Path<String>,
    params: std::result::Result<Query<RangeParams>, QueryRejection>,
) -> std::result::Result<Json<Vec<PriceResp>>, AppError> {
    let Query(params) = params?;
    let currency: SupportedCurrency = currency.parse()?;
    debug!("Range lookup {} from {} to {}", currency, params.start, params.end);

    let facade = state.facade;
    let quotes = tokio::task::spawn_blocking(move || -> Result<Vec<PriceResp>> {
        facade
            .range_lookup(currency, params.start, params.end)?
            .map(|quote| quote.map(PriceResp::from))
            .collect()
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    Ok(Json(quotes))
}
