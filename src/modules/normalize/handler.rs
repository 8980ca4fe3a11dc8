use axum::{extract::State, http::StatusCode, response::IntoResponse};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::dto::*;
use super::service::NormalizeService;
use crate::common::error::NormalizeError;
use crate::common::response::{ApiError, ApiSuccess, ErrorBody};
use crate::state::AppState;

/// Parses the raw body ourselves so malformed JSON still gets the
/// `{"error": ...}` shape. An empty body is an empty request.
fn parse_body<T>(body: &[u8]) -> Result<T, NormalizeError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| NormalizeError::InvalidRequest(format!("Invalid JSON body: {}", e)))
}

fn failure(err: NormalizeError) -> axum::response::Response {
    warn!("Normalize request failed: {}", err);
    ApiError::from(err).into_response()
}

/// Normalize a video between two pre-authorized URLs
#[utoipa::path(
    post,
    path = "/normalize",
    request_body = PresignedNormalizeRequest,
    responses(
        (status = 200, description = "Video normalized and uploaded", body = PresignedNormalizeResponse),
        (status = 400, description = "download_url or upload_url missing", body = ErrorBody),
        (status = 500, description = "Download, transcode or upload failed", body = ErrorBody)
    ),
    tag = "Normalize"
)]
pub async fn normalize_presigned(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let job = match parse_body::<PresignedNormalizeRequest>(&body).and_then(|req| req.validate()) {
        Ok(job) => job,
        Err(e) => return failure(e),
    };

    match NormalizeService::run_presigned(state, job).await {
        Ok(()) => ApiSuccess(PresignedNormalizeResponse { success: true }, StatusCode::OK).into_response(),
        Err(e) => failure(e),
    }
}

/// Normalize a video into the managed bucket
#[utoipa::path(
    post,
    path = "/normalize",
    request_body = StorageNormalizeRequest,
    responses(
        (status = 200, description = "Video normalized and stored", body = StorageNormalizeResponse),
        (status = 400, description = "source_url missing", body = ErrorBody),
        (status = 500, description = "Download, transcode or upload failed", body = ErrorBody)
    ),
    tag = "Normalize"
)]
pub async fn normalize_to_storage(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let job = match parse_body::<StorageNormalizeRequest>(&body).and_then(|req| req.validate()) {
        Ok(job) => job,
        Err(e) => return failure(e),
    };

    match NormalizeService::run_to_storage(state, job).await {
        Ok(normalized_url) => {
            ApiSuccess(StorageNormalizeResponse { normalized_url }, StatusCode::OK).into_response()
        }
        Err(e) => failure(e),
    }
}

/// Liveness probe. Performs no dependency checks.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health() -> impl IntoResponse {
    ApiSuccess(HealthResponse { ok: true }, StatusCode::OK)
}
