use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::project_role::ProjectRole;

/// 直接割り当てを表す source 値。
pub const SOURCE_DIRECT: &str = "direct";

/// ProjectMember はプロジェクトのメンバーシップレコードを表す。
///
/// 同じ (user_id, project_id) に対して複数行が存在しうる。
/// 直接割り当てとチーム・グループからの継承が併存するのは正常な状態である。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub role: ProjectRole,
    /// "direct" または継承元を示すタグ（例: "team:design"）。
    pub source: String,
    pub added_at: DateTime<Utc>,
}

impl ProjectMember {
    /// 直接割り当てのメンバーシップを生成する。
    pub fn direct(
        id: impl Into<String>,
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        role: ProjectRole,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            user_id: user_id.into(),
            role,
            source: SOURCE_DIRECT.to_string(),
            added_at,
        }
    }

    /// 継承によるメンバーシップを生成する。
    pub fn inherited(
        id: impl Into<String>,
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        role: ProjectRole,
        source: impl Into<String>,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            ..Self::direct(id, project_id, user_id, role, added_at)
        }
    }

    pub fn is_direct(&self) -> bool {
        self.source == SOURCE_DIRECT
    }
}
