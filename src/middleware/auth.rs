//! Bearer-token authentication → puts an `AuthCtx` into request extensions.
//!
//! Status contract (relied on by the dashboard):
//! - no/malformed `Authorization: Bearer <token>` header → 401, empty body
//! - token rejected by the identity provider → 403, empty body
//! - token verified but the identity has no email claim → 403, empty body
//!
//! The email claim is what namespaces compute-backend caches, so an identity
//! without one cannot be served even though its token is genuine.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Apply authentication to every route of the given router.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes(state.clone());
/// app = app.nest("/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot take a State extractor in axum 0.8, so the state is
    // passed explicitly via from_fn_with_state.
    router.layer(middleware::from_fn_with_state(state, require_auth))
}

async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    // Scheme must be exactly `Bearer ` with a non-empty token segment;
    // anything else counts as a missing credential (401), not a rejected
    // one (403).
    let token = header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let identity = match state.verifier.verify_id_token(token).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(error = ?err, "id token verification failed");
            return Err(AppError::Forbidden);
        }
    };

    let Some(email) = identity.email else {
        tracing::warn!(uid = %identity.uid, "verified identity has no email claim");
        return Err(AppError::Forbidden);
    };

    // middleware → extractor handoff
    req.extensions_mut()
        .insert(AuthCtx::new(identity.uid, email));

    Ok(next.run(req).await)
}
