/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the verified caller identity (AuthCtx) to handlers
 * - keep HTTP / axum plumbing in core and the plain type in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
