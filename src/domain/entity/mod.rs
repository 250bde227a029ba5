pub mod auth_user;
pub mod claims;
pub mod permission;
pub mod project_member;
pub mod project_role;
