use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ProjectRole はプロジェクトメンバーのロールを表す。
/// 宣言順がそのまま権限の強さの順序になる: viewer < member < admin < owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Viewer,
    Member,
    Admin,
    Owner,
}

impl ProjectRole {
    pub const ALL: [ProjectRole; 4] = [
        ProjectRole::Viewer,
        ProjectRole::Member,
        ProjectRole::Admin,
        ProjectRole::Owner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Viewer => "viewer",
            ProjectRole::Member => "member",
            ProjectRole::Admin => "admin",
            ProjectRole::Owner => "owner",
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ロール文字列のパースに失敗したことを表す。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for ProjectRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(ProjectRole::Viewer),
            "member" => Ok(ProjectRole::Member),
            "admin" => Ok(ProjectRole::Admin),
            "owner" => Ok(ProjectRole::Owner),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// EffectiveRole はメンバーシップ解決後にユーザーへ与えられる単一のロール。
/// superadmin はメンバーシップのロール値ではなく、グローバルフラグによるバイパスを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveRole {
    Superadmin,
    Project(ProjectRole),
}

impl Serialize for EffectiveRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EffectiveRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "superadmin" {
            return Ok(EffectiveRole::Superadmin);
        }
        s.parse::<ProjectRole>()
            .map(EffectiveRole::Project)
            .map_err(serde::de::Error::custom)
    }
}

impl EffectiveRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveRole::Superadmin => "superadmin",
            EffectiveRole::Project(role) => role.as_str(),
        }
    }

    /// プロジェクトロールであればそれを返す。
    pub fn project_role(&self) -> Option<ProjectRole> {
        match self {
            EffectiveRole::Superadmin => None,
            EffectiveRole::Project(role) => Some(*role),
        }
    }
}

impl fmt::Display for EffectiveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
