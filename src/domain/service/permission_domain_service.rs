use crate::domain::entity::permission::{role_has_permission, CheckRequest};
use crate::domain::entity::project_role::ProjectRole;

/// PermissionDecision は認可判定の結果を表す。
/// reason は診断用であり、エンドユーザーへそのまま表示しないこと。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PermissionDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PermissionDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// PermissionDomainService は解決済みロールから認可可否を判定するドメインロジックを提供する。
///
/// - superadmin        : 常に許可
/// - ロールなし        : 常に拒否
/// - MinimumRole(r)    : 解決済みロール >= r で許可
/// - Permission(p)     : ロールの権限表に p が含まれれば許可
pub struct PermissionDomainService;

impl PermissionDomainService {
    pub fn evaluate(
        resolved_role: Option<ProjectRole>,
        is_superadmin: bool,
        check: &CheckRequest,
    ) -> PermissionDecision {
        if is_superadmin {
            return PermissionDecision::allow();
        }

        let Some(role) = resolved_role else {
            return PermissionDecision::deny(format!(
                "insufficient permissions: no role on this project, {check} is required"
            ));
        };

        let allowed = match check {
            CheckRequest::MinimumRole(minimum) => role >= *minimum,
            CheckRequest::Permission(permission) => role_has_permission(role, *permission),
        };

        if allowed {
            PermissionDecision::allow()
        } else {
            PermissionDecision::deny(format!(
                "insufficient permissions: role '{role}' does not satisfy {check}"
            ))
        }
    }
}
