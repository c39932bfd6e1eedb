use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use http::StatusCode;

use crate::models::{AppState, ExchangeRate, ExchangeRateAnalyze};

use super::error_response;

pub async fn latest_rates(State(state): State<AppState>) -> impl IntoResponse {
    match state.rate_storage.latest_rates().await {
        Ok(rates) => (StatusCode::OK, Json(ExchangeRate::from(rates))).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
pub async fn rates_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    let parsed = (date.len() == 10)
        .then(|| NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok())
        .flatten();
    let Some(date) = parsed else {
        return error_response(StatusCode::NOT_FOUND, "invalid request");
    };
    match state.rate_storage.rates_for(date).await {
        Ok(rates) => (StatusCode::OK, Json(ExchangeRate::from(rates))).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
pub async fn rates_analyze(State(state): State<AppState>) -> impl IntoResponse {
    match state.rate_storage.aggregates().await {
        Ok(rates) => (StatusCode::OK, Json(ExchangeRateAnalyze::from(rates))).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
