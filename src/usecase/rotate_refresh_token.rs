use std::sync::Arc;

use crate::domain::entity::auth_user::AuthUser;
use crate::domain::repository::UserRepository;
use crate::infrastructure::token_codec::{RefreshIdentity, TokenCodec, TokenError};

/// RotateError はリフレッシュトークンのローテーションに関するエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum RotateError {
    /// 署名は正しいが、ユーザーが削除・無効化されている。
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("backing store failure: {0}")]
    BackingStore(#[source] anyhow::Error),
}

/// RotatedSession はローテーションで発行した新しいトークンペアと本人情報。
/// 永続化（SessionStore への書き込み）は呼び出し側の責務。
#[derive(Debug, Clone)]
pub struct RotatedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub family_id: String,
    pub user: AuthUser,
}

/// RotateRefreshTokenUseCase は検証済みリフレッシュトークンを新しいトークンペアに交換する。
///
/// トークンの内容をそのまま信用せず、ユーザーストアから現在の本人情報を再取得する。
/// 新しいリフレッシュトークンは消費したトークンと同じ family_id を引き継ぐ。
pub struct RotateRefreshTokenUseCase {
    user_repo: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
}

impl RotateRefreshTokenUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, codec: Arc<TokenCodec>) -> Self {
        Self { user_repo, codec }
    }

    pub async fn execute(&self, identity: &RefreshIdentity) -> Result<RotatedSession, RotateError> {
        let user = self
            .user_repo
            .find_by_id(&identity.user_id)
            .await
            .map_err(RotateError::BackingStore)?
            .ok_or_else(|| RotateError::UserNotFound(identity.user_id.clone()))?;

        let user = AuthUser::from(&user);
        let access_token = self.codec.issue_access(&user)?;
        let refresh = self
            .codec
            .issue_refresh(&user.id, Some(&identity.family_id))?;

        tracing::info!(
            user_id = %user.id,
            family_id = %refresh.family_id,
            "refresh token rotated"
        );

        Ok(RotatedSession {
            access_token,
            refresh_token: refresh.token,
            family_id: refresh.family_id,
            user,
        })
    }
}
