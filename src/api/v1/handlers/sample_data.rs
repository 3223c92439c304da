//! `POST /v1/load-sample-data` — multipart sample upload.

use axum::{Json, extract::Multipart, extract::State};
use serde_json::Value;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::state::AppState;

/// Stage the uploaded files locally, then ask the compute backend to load
/// them into the caller's cache namespace. The backend's JSON reply is
/// relayed as-is.
///
/// A multipart body with no files is a client error and never reaches the
/// compute backend.
pub async fn load_sample_data(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let staged = state.uploads.stage_multipart(multipart).await?;

    if staged.is_empty() {
        return Err(AppError::NoFilesUploaded);
    }

    tracing::info!(files = staged.len(), uid = %auth.uid, "loading sample data");

    let body = state
        .compute
        .load_sample_data(&staged, &auth.cache_dir())
        .await?;

    Ok(Json(body))
}
