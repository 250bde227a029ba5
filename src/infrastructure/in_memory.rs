//! テスト・ローカル開発用のインメモリリポジトリ実装。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entity::auth_user::User;
use crate::domain::entity::project_member::ProjectMember;
use crate::domain::repository::{ProjectMemberRepository, UserRepository};

/// InMemoryUserRepository はユーザー ID をキーにユーザーを保持する。
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// ユーザーを削除する。アカウント削除・無効化を表す。
    pub async fn remove(&self, user_id: &str) -> Option<User> {
        self.users.write().await.remove(user_id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }
}

/// InMemoryProjectMemberRepository はメンバーシップ行を保持する。
#[derive(Default)]
pub struct InMemoryProjectMemberRepository {
    members: Arc<RwLock<Vec<ProjectMember>>>,
}

impl InMemoryProjectMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, member: ProjectMember) {
        self.members.write().await.push(member);
    }
}

#[async_trait]
impl ProjectMemberRepository for InMemoryProjectMemberRepository {
    async fn find_by_user_and_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> anyhow::Result<Vec<ProjectMember>> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == user_id && m.project_id == project_id)
            .cloned()
            .collect())
    }
}
