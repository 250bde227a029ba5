//! ルートのプロジェクト ID に対してロール・権限を要求する axum ミドルウェア。

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::entity::auth_user::AuthUser;
use crate::domain::entity::permission::CheckRequest;
use crate::usecase::require_project_role::{AccessError, RequireProjectRoleUseCase};
use crate::usecase::verify_session::AuthOutcome;

/// ルートパラメータ名。ルートは `/projects/{project_id}/...` の形で定義すること。
pub const PROJECT_ID_PARAM: &str = "project_id";

/// ProjectAccessState はルートごとの要求条件と認可ユースケース。
#[derive(Clone)]
pub struct ProjectAccessState {
    pub authorizer: Arc<RequireProjectRoleUseCase>,
    pub check: CheckRequest,
}

impl ProjectAccessState {
    pub fn new(authorizer: Arc<RequireProjectRoleUseCase>, check: CheckRequest) -> Self {
        Self { authorizer, check }
    }
}

/// project_access_middleware は session_middleware が格納した AuthUser に対して
/// プロジェクトの実効ロールを解決し、要求条件を満たさなければ 403 を返す。
/// 成功時は ProjectAccess をリクエストエクステンションに格納する。
///
/// パスパラメータを参照するため Router::route_layer で適用すること。
pub async fn project_access_middleware(
    State(state): State<ProjectAccessState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(project_id) = params.get(PROJECT_ID_PARAM) else {
        tracing::error!("project access middleware mounted on a route without {PROJECT_ID_PARAM}");
        return AccessError::internal().into_response();
    };

    let Some(user) = req.extensions().get::<AuthUser>().cloned() else {
        return AccessError::unauthorized("Authentication required").into_response();
    };
    let rotated = req
        .extensions()
        .get::<AuthOutcome>()
        .is_some_and(AuthOutcome::is_rotated);

    match state
        .authorizer
        .authorize(user, project_id, &state.check, rotated)
        .await
    {
        Ok(access) => {
            req.extensions_mut().insert(access);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::middleware::session::{session_middleware, AuthState};
    use crate::config::{CookieConfig, JwtConfig};
    use crate::domain::entity::permission::ProjectPermission;
    use crate::domain::entity::project_member::ProjectMember;
    use crate::domain::entity::project_role::ProjectRole;
    use crate::domain::repository::{MockProjectMemberRepository, MockUserRepository};
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::secret_provider::StaticSecretProvider;
    use crate::infrastructure::session_store::CookieSettings;
    use crate::infrastructure::token_codec::TokenCodec;
    use crate::usecase::require_project_role::ProjectAccess;
    use crate::usecase::resolve_project_role::ResolveProjectRoleUseCase;
    use crate::usecase::rotate_refresh_token::RotateRefreshTokenUseCase;
    use crate::usecase::verify_session::VerifySessionUseCase;
    use axum::body::Body;
    use axum::http::header::COOKIE;
    use axum::http::StatusCode;
    use axum::routing::delete;
    use axum::{middleware, Extension, Router};
    use chrono::DateTime;
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-signing-secret-0123456789abcdef";

    fn make_codec() -> Arc<TokenCodec> {
        let clock = Arc::new(FixedClock::new(
            DateTime::from_timestamp(1_710_000_000, 0).unwrap(),
        ));
        Arc::new(
            TokenCodec::new(
                &JwtConfig::new("https://workspace.example.com"),
                &StaticSecretProvider::new(TEST_SECRET),
                clock,
            )
            .unwrap(),
        )
    }

    fn make_app(codec: Arc<TokenCodec>, role: ProjectRole) -> Router {
        let mut member_repo = MockProjectMemberRepository::new();
        member_repo
            .expect_find_by_user_and_project()
            .returning(move |user_id, project_id| {
                Ok(vec![ProjectMember::direct("pm-1", project_id, user_id, role, chrono::Utc::now())])
            });

        let rotator = Arc::new(RotateRefreshTokenUseCase::new(
            Arc::new(MockUserRepository::new()),
            codec.clone(),
        ));
        let verifier = Arc::new(VerifySessionUseCase::new(codec.clone(), rotator));
        let resolver = Arc::new(ResolveProjectRoleUseCase::new(Arc::new(member_repo)));
        let authorizer = Arc::new(RequireProjectRoleUseCase::new(verifier.clone(), resolver));

        let auth_state = AuthState::new(
            verifier,
            CookieSettings::new(&CookieConfig::default(), false, 900, 604_800),
        );
        let project_state = ProjectAccessState::new(
            authorizer,
            CheckRequest::Permission(ProjectPermission::DeleteProject),
        );

        Router::new()
            .route(
                "/projects/{project_id}",
                delete(|Extension(access): Extension<ProjectAccess>| async move {
                    axum::Json(serde_json::json!({ "role": access.user_role.role_name() }))
                }),
            )
            .route_layer(middleware::from_fn_with_state(
                project_state,
                project_access_middleware,
            ))
            .layer(middleware::from_fn_with_state(auth_state, session_middleware))
    }

    fn delete_request(codec: &TokenCodec) -> axum::http::Request<Body> {
        let user = AuthUser {
            id: "user-1".to_string(),
            email: "user-1@example.com".to_string(),
            admin: false,
            superadmin: false,
            enterprise_id: None,
        };
        let access = codec.issue_access(&user).unwrap();
        axum::http::Request::builder()
            .method("DELETE")
            .uri("/projects/p1")
            .header(COOKIE, format!("access_token={access}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_member_delete_project_returns_403() {
        let codec = make_codec();
        let app = make_app(codec.clone(), ProjectRole::Member);

        let resp = app.oneshot(delete_request(&codec)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "INSUFFICIENT_PERMISSIONS");
        assert_eq!(json["error"]["details"]["projectId"], "p1");
        assert_eq!(json["error"]["details"]["userRole"], "member");
        assert_eq!(json["error"]["details"]["requiredPermission"], "delete_project");
    }

    #[tokio::test]
    async fn test_owner_delete_project_passes() {
        let codec = make_codec();
        let app = make_app(codec.clone(), ProjectRole::Owner);

        let resp = app.oneshot(delete_request(&codec)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["role"], "owner");
    }

    #[tokio::test]
    async fn test_without_session_returns_401() {
        let app = make_app(make_codec(), ProjectRole::Owner);

        let req = axum::http::Request::builder()
            .method("DELETE")
            .uri("/projects/p1")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
