pub mod auth;
pub mod compute;
pub mod uploads;
