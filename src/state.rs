/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - built once at startup, read-only afterwards; Clone is cheap
 *   (Arc for the verifier, reqwest::Client and PathBuf internally elsewhere)
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;
use crate::services::compute::ComputeClient;
use crate::services::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    /// Validates Firebase ID tokens. Trait object so tests can swap in a
    /// canned verifier without talking to Google.
    pub verifier: Arc<dyn TokenVerifier>,
    pub compute: ComputeClient,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        compute: ComputeClient,
        uploads: UploadStore,
    ) -> Self {
        Self {
            verifier,
            compute,
            uploads,
        }
    }
}
