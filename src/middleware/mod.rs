/*
 * Responsibility
 * - public interface of the middleware stack (re-export)
 * - auth::apply(...), cors::apply(...), http::apply(...)
 */
pub mod auth;
pub mod cors;
pub mod http;
