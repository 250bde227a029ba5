use std::sync::Arc;

use crate::domain::entity::auth_user::AuthUser;
use crate::domain::repository::UserRepository;
use crate::infrastructure::session_store::SessionStore;
use crate::infrastructure::token_codec::{TokenCodec, TokenError};

/// SignInError はサインインのエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("backing store failure: {0}")]
    BackingStore(#[source] anyhow::Error),
}

/// SignInUseCase は資格情報の確認が済んだユーザーに新しいトークンファミリーを発行し、
/// セッションへ書き込む。資格情報の検証自体は扱わない。
pub struct SignInUseCase {
    user_repo: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
}

impl SignInUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, codec: Arc<TokenCodec>) -> Self {
        Self { user_repo, codec }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        session: &mut dyn SessionStore,
    ) -> Result<AuthUser, SignInError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(SignInError::BackingStore)?
            .ok_or_else(|| SignInError::UserNotFound(user_id.to_string()))?;

        let user = AuthUser::from(&user);
        let access_token = self.codec.issue_access(&user)?;
        let refresh = self.codec.issue_refresh(&user.id, None)?;
        session.write(&access_token, &refresh.token);

        tracing::info!(
            user_id = %user.id,
            family_id = %refresh.family_id,
            "user signed in"
        );

        Ok(user)
    }
}
