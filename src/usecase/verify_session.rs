use std::fmt;
use std::sync::Arc;

use crate::domain::entity::auth_user::AuthUser;
use crate::infrastructure::session_store::SessionStore;
use crate::infrastructure::token_codec::TokenCodec;
use crate::usecase::rotate_refresh_token::{RotateError, RotateRefreshTokenUseCase};

/// UnauthenticatedReason は未認証となった理由を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// アクセストークンもリフレッシュトークンも存在しない。
    NoCredentials,
    /// トークンが無効、または本人がユーザーストアに存在しない。
    InvalidToken,
}

impl UnauthenticatedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnauthenticatedReason::NoCredentials => "no credentials",
            UnauthenticatedReason::InvalidToken => "invalid token",
        }
    }
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AuthOutcome はセッション検証の終端状態。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// アクセストークンで認証された（高速パス）。
    Authenticated(AuthUser),
    /// リフレッシュトークンでローテーションした上で認証された。
    AuthenticatedAndRotated(AuthUser),
    Unauthenticated(UnauthenticatedReason),
}

impl AuthOutcome {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthOutcome::Authenticated(user) | AuthOutcome::AuthenticatedAndRotated(user) => {
                Some(user)
            }
            AuthOutcome::Unauthenticated(_) => None,
        }
    }

    pub fn into_user(self) -> Option<AuthUser> {
        match self {
            AuthOutcome::Authenticated(user) | AuthOutcome::AuthenticatedAndRotated(user) => {
                Some(user)
            }
            AuthOutcome::Unauthenticated(_) => None,
        }
    }

    pub fn is_rotated(&self) -> bool {
        matches!(self, AuthOutcome::AuthenticatedAndRotated(_))
    }
}

/// AuthError はセッション検証で発生した内部エラーを表す。
/// 認証失敗ではないため、未認証に読み替えてはならない。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("backing store failure: {0}")]
    BackingStore(#[source] anyhow::Error),

    #[error("failed to issue tokens: {0}")]
    TokenIssue(String),
}

/// VerifySessionUseCase はセッションのトークンペアから本人を確定する。
///
/// アクセストークンの検証はステートレスで DB を参照しない。
/// アクセストークンが無効でリフレッシュトークンが有効な場合のみ、
/// ユーザーストアを参照してローテーションし、新しいペアをセッションに書き込む。
pub struct VerifySessionUseCase {
    codec: Arc<TokenCodec>,
    rotator: Arc<RotateRefreshTokenUseCase>,
}

impl VerifySessionUseCase {
    pub fn new(codec: Arc<TokenCodec>, rotator: Arc<RotateRefreshTokenUseCase>) -> Self {
        Self { codec, rotator }
    }

    /// セッションを検証する。必要に応じてローテーションしセッションへ書き込む。
    pub async fn execute(&self, session: &mut dyn SessionStore) -> Result<AuthOutcome, AuthError> {
        let tokens = session.read();
        if tokens.is_empty() {
            return Ok(AuthOutcome::Unauthenticated(
                UnauthenticatedReason::NoCredentials,
            ));
        }

        if let Some(access_token) = tokens.access_token.as_deref() {
            if let Ok(user) = self.codec.verify_access(access_token) {
                return Ok(AuthOutcome::Authenticated(user));
            }
        }

        let Some(refresh_token) = tokens.refresh_token.as_deref() else {
            return Ok(AuthOutcome::Unauthenticated(
                UnauthenticatedReason::InvalidToken,
            ));
        };

        let Ok(identity) = self.codec.verify_refresh(refresh_token) else {
            session.clear();
            return Ok(AuthOutcome::Unauthenticated(
                UnauthenticatedReason::InvalidToken,
            ));
        };

        match self.rotator.execute(&identity).await {
            Ok(rotated) => {
                session.write(&rotated.access_token, &rotated.refresh_token);
                Ok(AuthOutcome::AuthenticatedAndRotated(rotated.user))
            }
            Err(RotateError::UserNotFound(user_id)) => {
                tracing::warn!(
                    user_id = %user_id,
                    family_id = %identity.family_id,
                    "refresh token presented for a user that no longer exists"
                );
                session.clear();
                Ok(AuthOutcome::Unauthenticated(
                    UnauthenticatedReason::InvalidToken,
                ))
            }
            Err(RotateError::BackingStore(e)) => {
                tracing::error!(error = %e, user_id = %identity.user_id, "user lookup failed during rotation");
                Err(AuthError::BackingStore(e))
            }
            Err(RotateError::Token(e)) => {
                tracing::error!(error = %e, "failed to issue rotated tokens");
                Err(AuthError::TokenIssue(e.to_string()))
            }
        }
    }

    /// アクセストークンだけを検証し、ローテーションは行わない。
    ///
    /// セッションを書き換えられない読み取り専用の経路向け。
    /// 期限切れの場合は None を返し、呼び出し側は Cookie を書き込める経路へ誘導すること。
    pub fn identity_without_rotation(&self, session: &dyn SessionStore) -> Option<AuthUser> {
        let access_token = session.read().access_token?;
        self.codec.verify_access(&access_token).ok()
    }
}
