use crate::handlers::{latest_rates, rates_analyze, rates_by_date};
use crate::models::AppState;
use axum::routing::get;
use axum::Router;

pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/latest", get(latest_rates))
        .route("/analyze", get(rates_analyze))
        .route("/{date}", get(rates_by_date))
        .with_state(state)
}
