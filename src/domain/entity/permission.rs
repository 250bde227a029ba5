use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entity::project_role::ProjectRole;

/// ProjectPermission はプロジェクト内の細粒度な操作権限を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPermission {
    ViewProject,
    ViewDocument,
    CreateDocument,
    EditDocument,
    DeleteDocument,
    ManageStickyNotes,
    ManageQuickLinks,
    EditProject,
    ManageMembers,
    DeleteProject,
    TransferOwnership,
}

/// viewer に付与される権限。
const VIEWER_PERMISSIONS: &[ProjectPermission] = &[
    ProjectPermission::ViewProject,
    ProjectPermission::ViewDocument,
];

/// member に付与される権限。
const MEMBER_PERMISSIONS: &[ProjectPermission] = &[
    ProjectPermission::ViewProject,
    ProjectPermission::ViewDocument,
    ProjectPermission::CreateDocument,
    ProjectPermission::EditDocument,
    ProjectPermission::ManageStickyNotes,
    ProjectPermission::ManageQuickLinks,
];

/// admin に付与される権限。
const ADMIN_PERMISSIONS: &[ProjectPermission] = &[
    ProjectPermission::ViewProject,
    ProjectPermission::ViewDocument,
    ProjectPermission::CreateDocument,
    ProjectPermission::EditDocument,
    ProjectPermission::DeleteDocument,
    ProjectPermission::ManageStickyNotes,
    ProjectPermission::ManageQuickLinks,
    ProjectPermission::EditProject,
    ProjectPermission::ManageMembers,
];

/// owner に付与される権限。
const OWNER_PERMISSIONS: &[ProjectPermission] = &[
    ProjectPermission::ViewProject,
    ProjectPermission::ViewDocument,
    ProjectPermission::CreateDocument,
    ProjectPermission::EditDocument,
    ProjectPermission::DeleteDocument,
    ProjectPermission::ManageStickyNotes,
    ProjectPermission::ManageQuickLinks,
    ProjectPermission::EditProject,
    ProjectPermission::ManageMembers,
    ProjectPermission::DeleteProject,
    ProjectPermission::TransferOwnership,
];

impl ProjectPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPermission::ViewProject => "view_project",
            ProjectPermission::ViewDocument => "view_document",
            ProjectPermission::CreateDocument => "create_document",
            ProjectPermission::EditDocument => "edit_document",
            ProjectPermission::DeleteDocument => "delete_document",
            ProjectPermission::ManageStickyNotes => "manage_sticky_notes",
            ProjectPermission::ManageQuickLinks => "manage_quick_links",
            ProjectPermission::EditProject => "edit_project",
            ProjectPermission::ManageMembers => "manage_members",
            ProjectPermission::DeleteProject => "delete_project",
            ProjectPermission::TransferOwnership => "transfer_ownership",
        }
    }
}

impl fmt::Display for ProjectPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 権限名のパースに失敗したことを表す。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for ProjectPermission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OWNER_PERMISSIONS
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// ロールに付与される権限の一覧を返す。
pub fn permissions_for(role: ProjectRole) -> &'static [ProjectPermission] {
    match role {
        ProjectRole::Viewer => VIEWER_PERMISSIONS,
        ProjectRole::Member => MEMBER_PERMISSIONS,
        ProjectRole::Admin => ADMIN_PERMISSIONS,
        ProjectRole::Owner => OWNER_PERMISSIONS,
    }
}

/// ロールが指定の権限を持つかを判定する。
pub fn role_has_permission(role: ProjectRole, permission: ProjectPermission) -> bool {
    permissions_for(role).contains(&permission)
}

/// CheckRequest は認可チェックのモードを表す。
/// 最低ロール要求と名前付き権限要求のどちらか一方だけを指定する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRequest {
    MinimumRole(ProjectRole),
    Permission(ProjectPermission),
}

impl fmt::Display for CheckRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckRequest::MinimumRole(role) => write!(f, "role '{role}' or higher"),
            CheckRequest::Permission(permission) => write!(f, "permission '{permission}'"),
        }
    }
}
