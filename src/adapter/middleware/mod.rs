pub mod project;
pub mod session;

pub use project::{project_access_middleware, ProjectAccessState, PROJECT_ID_PARAM};
pub use session::{session_middleware, AuthState};
