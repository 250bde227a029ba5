use serde::{Deserialize, Serialize};

/// AuthUser は検証済みトークンから導出される認証済みユーザーを表す。
/// 永続化はせず、常にトークンまたはユーザーストアから再構築する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub admin: bool,
    pub superadmin: bool,
    pub enterprise_id: Option<String>,
}

/// User はユーザーストアが返すユーザーレコードを表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub superadmin: bool,
    #[serde(default)]
    pub enterprise_id: Option<String>,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            admin: user.admin,
            superadmin: user.superadmin,
            enterprise_id: user.enterprise_id.clone(),
        }
    }
}

impl std::fmt::Display for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AuthUser{{id={}, admin={}, superadmin={}, enterprise_id={:?}}}",
            self.id, self.admin, self.superadmin, self.enterprise_id,
        )
    }
}
