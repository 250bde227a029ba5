use std::sync::Arc;

use crate::domain::entity::auth_user::AuthUser;
use crate::domain::entity::project_role::{EffectiveRole, ProjectRole};
use crate::domain::repository::ProjectMemberRepository;

/// ResolveError はロール解決のエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("backing store failure: {0}")]
    BackingStore(#[source] anyhow::Error),
}

/// RoleResolution はユーザーのプロジェクトにおける実効ロール。
/// role が None の場合はメンバーシップが存在しないことを表し、拒否とは区別される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResolution {
    pub role: Option<EffectiveRole>,
    pub is_superadmin: bool,
}

impl RoleResolution {
    fn superadmin() -> Self {
        Self {
            role: Some(EffectiveRole::Superadmin),
            is_superadmin: true,
        }
    }

    /// メンバーシップ由来のプロジェクトロールを返す。superadmin の場合は None。
    pub fn project_role(&self) -> Option<ProjectRole> {
        self.role.and_then(|r| r.project_role())
    }

    /// 診断用のロール名。メンバーシップがない場合は "none"。
    pub fn role_name(&self) -> &'static str {
        self.role.as_ref().map_or("none", EffectiveRole::as_str)
    }
}

/// ResolveProjectRoleUseCase はユーザーがプロジェクトに持つ全メンバーシップを集約し、
/// 単一の実効ロールに解決する。
///
/// 1. superadmin はメンバーシップを参照せずに即座に superadmin を返す
/// 2. メンバーシップがなければ role = None
/// 3. 複数ある場合は最も権限の強いロールを採用する
pub struct ResolveProjectRoleUseCase {
    member_repo: Arc<dyn ProjectMemberRepository>,
}

impl ResolveProjectRoleUseCase {
    pub fn new(member_repo: Arc<dyn ProjectMemberRepository>) -> Self {
        Self { member_repo }
    }

    pub async fn execute(
        &self,
        user: &AuthUser,
        project_id: &str,
    ) -> Result<RoleResolution, ResolveError> {
        if user.superadmin {
            return Ok(RoleResolution::superadmin());
        }

        let members = self
            .member_repo
            .find_by_user_and_project(&user.id, project_id)
            .await
            .map_err(ResolveError::BackingStore)?;

        let role = members.iter().map(|m| m.role).max();
        if members.len() > 1 {
            tracing::debug!(
                user_id = %user.id,
                project_id = %project_id,
                memberships = members.len(),
                "resolved multiple project memberships"
            );
        }

        Ok(RoleResolution {
            role: role.map(EffectiveRole::Project),
            is_superadmin: false,
        })
    }
}
