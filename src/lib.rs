//! workspace-auth: ワークスペースアプリケーションの認証トークンライフサイクルと
//! プロジェクト単位の認可エンジン。
//!
//! アクセストークン / リフレッシュトークンのペアを発行・検証・ローテーションし、
//! プロジェクトのメンバーシップからロールを解決して操作の可否を判定する。
//!
//! # 使い方
//!
//! ```ignore
//! use std::sync::Arc;
//! use workspace_auth::{
//!     CheckRequest, EnvSecretProvider, ProjectPermission, RequireProjectRoleUseCase,
//!     SystemClock, TokenCodec,
//! };
//!
//! let config = workspace_auth::config::load("config/config.yaml", None)?;
//! let secrets = EnvSecretProvider::new(&config.jwt.secret_env);
//! let codec = Arc::new(TokenCodec::new(&config.jwt, &secrets, Arc::new(SystemClock))?);
//!
//! let access = require_project_role
//!     .execute(&mut session, "project-1", &CheckRequest::Permission(ProjectPermission::DeleteProject))
//!     .await?;
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod usecase;

pub use domain::entity::auth_user::AuthUser;
pub use domain::entity::permission::{CheckRequest, ProjectPermission};
pub use domain::entity::project_member::ProjectMember;
pub use domain::entity::project_role::{EffectiveRole, ProjectRole};
pub use domain::service::permission_domain_service::{PermissionDecision, PermissionDomainService};
pub use infrastructure::clock::{Clock, FixedClock, SystemClock};
pub use infrastructure::secret_provider::{EnvSecretProvider, SecretProvider, StaticSecretProvider};
pub use infrastructure::session_store::{
    CookieSessionStore, InMemorySessionStore, SessionStore, SessionTokens,
};
pub use infrastructure::token_codec::{IssuedRefreshToken, RefreshIdentity, TokenCodec, TokenError};
pub use usecase::require_project_role::{AccessError, ProjectAccess, RequireProjectRoleUseCase};
pub use usecase::resolve_project_role::{ResolveProjectRoleUseCase, RoleResolution};
pub use usecase::rotate_refresh_token::{RotateError, RotateRefreshTokenUseCase, RotatedSession};
pub use usecase::sign_in::{SignInError, SignInUseCase};
pub use usecase::sign_out::SignOutUseCase;
pub use usecase::verify_session::{AuthError, AuthOutcome, UnauthenticatedReason, VerifySessionUseCase};
