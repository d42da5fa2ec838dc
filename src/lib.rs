//! Authentication core of the attendance API.
//!
//! - `services::auth`: KeyStore, TokenCodec, Claims, role checks, token issuance
//! - `middleware::auth`: axum guard that verifies tokens and injects `AuthCtx`
//! - `app`: wiring for the HTTP binary

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
