use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;

use crate::domain::entity::auth_user::AuthUser;
use crate::domain::entity::permission::{CheckRequest, ProjectPermission};
use crate::domain::service::PermissionDomainService;
use crate::infrastructure::session_store::SessionStore;
use crate::usecase::resolve_project_role::{ResolveProjectRoleUseCase, RoleResolution};
use crate::usecase::verify_session::{AuthOutcome, VerifySessionUseCase};

pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const CODE_INSUFFICIENT_PERMISSIONS: &str = "INSUFFICIENT_PERMISSIONS";
pub const CODE_INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// ProjectAccess は認可に成功した場合の本人とロール。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAccess {
    pub user: AuthUser,
    pub user_role: RoleResolution,
    /// このリクエストでトークンペアをローテーションしたか。
    pub rotated: bool,
}

/// AccessErrorDetails は 403 応答に含める診断情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessErrorDetails {
    pub project_id: String,
    pub user_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// AccessError はプロジェクト認可の失敗を HTTP ステータスとエラーコード付きで表す。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AccessError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<AccessErrorDetails>,
}

impl AccessError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: CODE_UNAUTHORIZED,
            message: message.into(),
            details: None,
        }
    }

    pub fn insufficient_permissions(details: AccessErrorDetails) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: CODE_INSUFFICIENT_PERMISSIONS,
            message: "Insufficient permissions for this project".to_string(),
            details: Some(details),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: CODE_INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            details: None,
        }
    }
}

/// RequireProjectRoleUseCase はセッション検証 → ロール解決 → 権限判定を合成する
/// プロジェクト単位の認可エントリポイント。
pub struct RequireProjectRoleUseCase {
    verifier: Arc<VerifySessionUseCase>,
    resolver: Arc<ResolveProjectRoleUseCase>,
}

impl RequireProjectRoleUseCase {
    pub fn new(
        verifier: Arc<VerifySessionUseCase>,
        resolver: Arc<ResolveProjectRoleUseCase>,
    ) -> Self {
        Self { verifier, resolver }
    }

    pub async fn execute(
        &self,
        session: &mut dyn SessionStore,
        project_id: &str,
        check: &CheckRequest,
    ) -> Result<ProjectAccess, AccessError> {
        let (user, rotated) = self.authenticate(session, project_id).await?;
        self.authorize(user, project_id, check, rotated).await
    }

    /// 権限名の文字列で判定する。未知の権限名は superadmin 以外 403 として拒否する。
    pub async fn execute_named_permission(
        &self,
        session: &mut dyn SessionStore,
        project_id: &str,
        permission: &str,
    ) -> Result<ProjectAccess, AccessError> {
        let (user, rotated) = self.authenticate(session, project_id).await?;

        match permission.parse::<ProjectPermission>() {
            Ok(permission) => {
                self.authorize(user, project_id, &CheckRequest::Permission(permission), rotated)
                    .await
            }
            Err(e) => {
                let resolution = self.resolve(&user, project_id).await?;
                if resolution.is_superadmin {
                    return Ok(ProjectAccess {
                        user,
                        user_role: resolution,
                        rotated,
                    });
                }
                tracing::warn!(
                    user_id = %user.id,
                    project_id = %project_id,
                    permission = %permission,
                    "unknown permission requested"
                );
                Err(AccessError::insufficient_permissions(AccessErrorDetails {
                    project_id: project_id.to_string(),
                    user_role: resolution.role_name().to_string(),
                    required_role: None,
                    required_permission: Some(permission.to_string()),
                    reason: Some(e.to_string()),
                }))
            }
        }
    }

    async fn authenticate(
        &self,
        session: &mut dyn SessionStore,
        project_id: &str,
    ) -> Result<(AuthUser, bool), AccessError> {
        let outcome = self.verifier.execute(session).await.map_err(|e| {
            tracing::debug!(error = %e, project_id = %project_id, "session verification failed");
            AccessError::internal()
        })?;

        let rotated = outcome.is_rotated();
        match outcome {
            AuthOutcome::Authenticated(user) | AuthOutcome::AuthenticatedAndRotated(user) => {
                Ok((user, rotated))
            }
            AuthOutcome::Unauthenticated(reason) => {
                tracing::debug!(project_id = %project_id, reason = %reason, "request is not authenticated");
                Err(AccessError::unauthorized("Authentication required"))
            }
        }
    }

    async fn resolve(&self, user: &AuthUser, project_id: &str) -> Result<RoleResolution, AccessError> {
        self.resolver.execute(user, project_id).await.map_err(|e| {
            tracing::error!(
                error = %e,
                user_id = %user.id,
                project_id = %project_id,
                "project role resolution failed"
            );
            AccessError::internal()
        })
    }

    /// 認証済みのユーザーに対してロール解決と権限判定のみを行う。
    /// ミドルウェアで既に本人が確定している場合に使用する。
    pub async fn authorize(
        &self,
        user: AuthUser,
        project_id: &str,
        check: &CheckRequest,
        rotated: bool,
    ) -> Result<ProjectAccess, AccessError> {
        let resolution = self.resolve(&user, project_id).await?;

        let decision = PermissionDomainService::evaluate(
            resolution.project_role(),
            resolution.is_superadmin,
            check,
        );

        if !decision.allowed {
            tracing::info!(
                user_id = %user.id,
                project_id = %project_id,
                user_role = %resolution.role_name(),
                requirement = %check,
                "project access denied"
            );
            let (required_role, required_permission) = match check {
                CheckRequest::MinimumRole(role) => (Some(role.to_string()), None),
                CheckRequest::Permission(permission) => (None, Some(permission.to_string())),
            };
            return Err(AccessError::insufficient_permissions(AccessErrorDetails {
                project_id: project_id.to_string(),
                user_role: resolution.role_name().to_string(),
                required_role,
                required_permission,
                reason: decision.reason,
            }));
        }

        Ok(ProjectAccess {
            user,
            user_role: resolution,
            rotated,
        })
    }
}
