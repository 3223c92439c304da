//! Token-verifier interface used by the authentication middleware.
use async_trait::async_trait;
use thiserror::Error;

/// Verification errors.
///
/// Every provider rejection collapses into `InvalidToken`: a signature
/// mismatch, an expired token, an unknown signing key and a failed key fetch
/// all mean the same thing to the caller (the request is refused with 403).
/// The inner string exists for logging only and is never sent to clients.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid id token: {0}")]
    InvalidToken(String),
}

/// Identity decoded from a verified ID token.
///
/// `email` stays optional here: tokens for anonymous or phone-number accounts
/// verify fine but carry no email claim. Whether that is acceptable is the
/// middleware's decision, not the verifier's.
#[derive(Debug, Clone)]
pub struct DecodedIdentity {
    pub uid: String,
    pub email: Option<String>,
}

/// A verifier of bearer ID tokens.
///
/// One verification per call, no retries. Implementations must not cache
/// verification results; callers rely on revocation taking effect as soon as
/// the provider stops honoring a token.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify_id_token(&self, token: &str) -> Result<DecodedIdentity, VerifyError>;
}
