/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: TokenService (TokenCodec / KeyStore を内包)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::TokenService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<TokenService>,
}

impl AppState {
    pub fn new(auth: Arc<TokenService>) -> Self {
        Self { auth }
    }
}
