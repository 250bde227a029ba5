pub mod project_member_repository;
pub mod user_repository;

pub use project_member_repository::ProjectMemberRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use project_member_repository::MockProjectMemberRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
