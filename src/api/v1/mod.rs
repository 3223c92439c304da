/*
 * Responsibility
 * - public surface of the v1 API (routes() re-export)
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
