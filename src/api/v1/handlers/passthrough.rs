//! `GET|DELETE /v1/{api}` — generic passthrough to the compute backend.
//!
//! The dashboard talks to a dozen plumber endpoints through these two routes
//! (`tsne`, `knn`, `gene-expression`, `cache-files`, `delete-cache-file`,
//! ...). The proxy adds nothing but the caller's `cachedir`; it forwards the
//! query string as received, duplicates and order included, which is why the
//! raw query is parsed here instead of going through a de-duplicating map
//! extractor.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::Method,
};
use serde_json::Value;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::state::AppState;

pub async fn forward_get(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(api): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    tracing::info!(api = %api, uid = %auth.uid, "forwarding GET to compute backend");

    let body = state
        .compute
        .forward(
            Method::GET,
            &api,
            client_params(query.as_deref()),
            &auth.cache_dir(),
        )
        .await?;

    Ok(Json(body))
}

pub async fn forward_delete(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(api): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    tracing::info!(api = %api, uid = %auth.uid, "forwarding DELETE to compute backend");

    let body = state
        .compute
        .forward(
            Method::DELETE,
            &api,
            client_params(query.as_deref()),
            &auth.cache_dir(),
        )
        .await?;

    Ok(Json(body))
}

/// Decode the incoming query string into ordered pairs.
fn client_params(query: Option<&str>) -> Vec<(String, String)> {
    match query {
        Some(query) => url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
        None => Vec::new(),
    }
}
