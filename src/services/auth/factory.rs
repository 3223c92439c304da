/// Factory: build the production `TokenVerifier` from application `AppConfig`.
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::auth::firebase::{CredentialError, FirebaseVerifier};
use crate::services::auth::verifier::TokenVerifier;

pub fn build_verifier(config: &AppConfig) -> Result<Arc<dyn TokenVerifier>, CredentialError> {
    let verifier =
        FirebaseVerifier::from_service_account_file(&config.firebase.service_account_file)?;

    tracing::info!(project_id = %verifier.project_id(), "firebase token verifier ready");

    Ok(Arc::new(verifier))
}
