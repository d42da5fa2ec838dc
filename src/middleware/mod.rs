/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth (AuthGuard), http (request-id / trace / timeout), security_headers
 */
pub mod auth;
pub mod http;
pub mod security_headers;
