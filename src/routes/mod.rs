use crate::models::AppState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use http::{Request, Response, StatusCode};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

mod api_routes;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn init(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<axum::body::Body>| {
            tracing::debug_span!("rates-request", path = %request.uri().path())
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            tracing::debug!("{} in {latency:?}", response.status())
        })
        .on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
            tracing::error!("Ошибка при обработке запроса: {error:?} latency: {latency:?}")
        });
    Router::new()
        .route("/health", get(health_check))
        .nest("/rates", api_routes::init(state))
        .layer(trace)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Rates are being served").into_response()
}
