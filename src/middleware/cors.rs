//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Server-to-server calls (and curl) are not
//!   restricted by it; authentication is what actually guards the API.
//! - This middleware should be applied at the Router level (not inside
//!   handlers).
//!
//! Policy:
//! - Exact-match allowlist from config. Defaults to the production dashboard
//!   origin plus the local dev server, never a wildcard: requests carry an
//!   Authorization header, and browsers refuse wildcard origins for those
//!   anyway.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AppConfig;

/// Apply the CORS policy to the given Router.
pub fn apply(router: Router, config: &AppConfig) -> Router {
    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
