pub mod factory;
pub mod firebase;
pub mod verifier;

pub use factory::build_verifier;
pub use firebase::FirebaseVerifier;
pub use verifier::{DecodedIdentity, TokenVerifier, VerifyError};
