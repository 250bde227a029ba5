use async_trait::async_trait;

use crate::domain::entity::project_member::ProjectMember;

/// ProjectMemberRepository はプロジェクトメンバーシップの取得を抽象化する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectMemberRepository: Send + Sync {
    /// ユーザーがプロジェクトに対して持つ全てのメンバーシップを取得する。
    /// 直接割り当てと継承の両方を含み、存在しない場合は空の Vec を返す。
    async fn find_by_user_and_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> anyhow::Result<Vec<ProjectMember>>;
}
