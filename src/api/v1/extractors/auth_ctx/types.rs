/*
 * Responsibility
 * - the "verified caller" type as seen from handlers
 * - the middleware verifies the token and stores this in request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - token verification itself lives in middleware/services; this is the
 *   contract type and stays free of axum/jsonwebtoken details
 */

/// Context attached to every authenticated request.
///
/// - `uid` is the identity provider's stable account id (used in logs)
/// - `email` is the caller-facing identifier; guaranteed non-empty because
///   the middleware refuses tokens without an email claim
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub uid: String,
    pub email: String,
}

impl AuthCtx {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }

    /// Compute-backend cache namespace for this caller. Every proxied request
    /// carries exactly one `cachedir` with this value.
    pub fn cache_dir(&self) -> String {
        format!("cache/{}", self.email)
    }
}
