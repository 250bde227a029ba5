use async_trait::async_trait;

use crate::domain::entity::auth_user::User;

/// UserRepository はユーザーの正となるストアへのアクセスを抽象化する。
/// リフレッシュトークンのローテーション時にのみ参照される。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザー ID でユーザーを取得する。削除・無効化済みの場合は None を返す。
    async fn find_by_id(&self, user_id: &str) -> anyhow::Result<Option<User>>;
}
