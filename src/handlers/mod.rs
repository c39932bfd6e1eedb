mod rates;
pub use rates::*;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
