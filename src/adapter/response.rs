//! 認証・認可エラーの HTTP レスポンス変換。

use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::usecase::require_project_role::{AccessError, CODE_INTERNAL_SERVER_ERROR};
use crate::usecase::verify_session::AuthError;

/// ErrorResponse は `{"error": {"code", "message", "details"}}` 形式のエラーレスポンス。
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
    set_cookies: Vec<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            set_cookies: Vec::new(),
        }
    }

    /// セッション Cookie の更新・削除をエラーレスポンスにも載せる。
    pub fn with_set_cookies(mut self, set_cookies: Vec<String>) -> Self {
        self.set_cookies = set_cookies;
        self
    }
}

impl From<AccessError> for ErrorResponse {
    fn from(err: AccessError) -> Self {
        let details = err
            .details
            .and_then(|d| serde_json::to_value(d).ok());
        Self {
            status: err.status,
            code: err.code,
            message: err.message,
            details,
            set_cookies: Vec::new(),
        }
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(_: AuthError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_INTERNAL_SERVER_ERROR,
            "Internal server error",
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let mut error = json!({
            "code": self.code,
            "message": self.message,
        });
        if let Some(details) = self.details {
            error["details"] = details;
        }

        let mut response = (self.status, Json(json!({ "error": error }))).into_response();
        append_set_cookies(&mut response, self.set_cookies);
        response
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Set-Cookie ヘッダーをレスポンスへ追加する。ヘッダー値にできないものは破棄する。
pub fn append_set_cookies(response: &mut Response, set_cookies: Vec<String>) {
    for directive in set_cookies {
        match HeaderValue::from_str(&directive) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "failed to encode Set-Cookie header"),
        }
    }
}
