pub mod permission_domain_service;

pub use permission_domain_service::{PermissionDecision, PermissionDomainService};
