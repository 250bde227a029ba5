//! Cookie セッションを検証し、必要に応じてローテーションする axum ミドルウェア。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapter::response::{append_set_cookies, ErrorResponse};
use crate::infrastructure::session_store::{CookieSessionStore, CookieSettings};
use crate::usecase::require_project_role::CODE_UNAUTHORIZED;
use crate::usecase::verify_session::{AuthOutcome, VerifySessionUseCase};

/// AuthState はセッションミドルウェアが使用する共有状態。
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<VerifySessionUseCase>,
    pub cookies: CookieSettings,
}

impl AuthState {
    pub fn new(verifier: Arc<VerifySessionUseCase>, cookies: CookieSettings) -> Self {
        Self { verifier, cookies }
    }
}

/// session_middleware はリクエストの Cookie からセッションを検証する。
///
/// 認証成功時は AuthUser と AuthOutcome をリクエストエクステンションに格納する。
/// ローテーションやセッション削除で生じた Set-Cookie はレスポンスに付与する。
/// 未認証は 401、ユーザーストア障害は 500 を返す。
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut session = CookieSessionStore::from_headers(state.cookies.clone(), req.headers());

    let outcome = match state.verifier.execute(&mut session).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::debug!(error = %e, path = %req.uri().path(), "session verification failed");
            return ErrorResponse::from(e).into_response();
        }
    };

    let set_cookies = session.take_set_cookies();
    let Some(user) = outcome.user().cloned() else {
        return ErrorResponse::new(
            StatusCode::UNAUTHORIZED,
            CODE_UNAUTHORIZED,
            "Authentication required",
        )
        .with_set_cookies(set_cookies)
        .into_response();
    };

    if matches!(outcome, AuthOutcome::AuthenticatedAndRotated(_)) {
        tracing::debug!(user_id = %user.id, "session rotated by middleware");
    }

    req.extensions_mut().insert(user);
    req.extensions_mut().insert(outcome);

    let mut response = next.run(req).await;
    append_set_cookies(&mut response, set_cookies);
    response
}
