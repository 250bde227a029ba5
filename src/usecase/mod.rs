pub mod require_project_role;
pub mod resolve_project_role;
pub mod rotate_refresh_token;
pub mod sign_in;
pub mod sign_out;
pub mod verify_session;

pub use require_project_role::{AccessError, ProjectAccess, RequireProjectRoleUseCase};
pub use resolve_project_role::{ResolveError, ResolveProjectRoleUseCase, RoleResolution};
pub use rotate_refresh_token::{RotateError, RotateRefreshTokenUseCase, RotatedSession};
pub use sign_in::{SignInError, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use verify_session::{AuthError, AuthOutcome, UnauthenticatedReason, VerifySessionUseCase};
