/*
 * Responsibility
 * - URL structure of /v1
 * - every route here sits behind bearer authentication, applied to the whole
 *   subtree so unknown paths are refused before they 404
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};

use crate::api::v1::handlers::{passthrough, sample_data};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        // Sample uploads are whole count matrices; axum's 2 MB default body
        // cap would reject them.
        .route(
            "/load-sample-data",
            post(sample_data::load_sample_data).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/{api}",
            get(passthrough::forward_get).delete(passthrough::forward_delete),
        )
        .fallback(not_found);

    middleware::auth::apply(router, state)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
