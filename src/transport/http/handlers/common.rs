use crate::app::error::VValletError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Maps a client result onto the API envelope.
///
/// Malformed keys are the caller's fault (400), missing accounts are 404,
/// anything else the node rejected is 502.
pub fn respond<T: Serialize>(result: Result<T, VValletError>) -> Response {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err(format!("Failed to serialize response: {}", e))),
            )
                .into_response(),
        },
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::warn!(error = %e, "lookup failed");
            }
            (status, Json(ApiResponse::err(e.to_string()))).into_response()
        }
    }
}

pub fn status_for(err: &VValletError) -> StatusCode {
    match err {
        VValletError::InvalidPubkey(_) => StatusCode::BAD_REQUEST,
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        VValletError::Remote(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
