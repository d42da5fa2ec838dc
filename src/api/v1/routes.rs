/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証が必要な範囲ごとに AuthGuard (必要ロール) を route_layer で適用する
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    keys::list_signing_keys, session::current_session, token::refresh,
};
use crate::middleware::auth::AuthGuard;
use crate::services::auth::Role;
use crate::state::AppState;

/// Query parameter carrying the token for kiosk/dashboard screens.
pub const KIOSK_TOKEN_PARAM: &str = "token";

pub fn routes(state: &AppState) -> Router<AppState> {
    let codec = state.auth.codec().clone();

    let public: Router<AppState> = Router::new().route("/auth/refresh", post(refresh));

    let authenticated: Router<AppState> = AuthGuard::bearer(codec.clone(), &[])
        .apply(Router::new().route("/session", get(current_session)));

    let admin: Router<AppState> = AuthGuard::bearer(codec.clone(), &[Role::Admin])
        .apply(Router::new().route("/admin/keys", get(list_signing_keys)));

    let kiosk_roles = [Role::QrCode, Role::Dashboard];
    let kiosk: Router<AppState> = AuthGuard::query(codec, KIOSK_TOKEN_PARAM, &kiosk_roles)
        .apply(Router::new().route("/kiosk/session", get(current_session)));

    public.merge(authenticated).merge(admin).merge(kiosk)
}
