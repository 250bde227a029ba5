use serde::{Deserialize, Serialize};

use crate::domain::entity::auth_user::AuthUser;

/// アクセストークンの type クレーム値。
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// リフレッシュトークンの type クレーム値。
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// AccessClaims は短命なアクセストークンの Claims を表す。
/// 通常のリクエストでは DB を参照せずにこの Claims だけで本人確認を行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub superadmin: bool,
    #[serde(rename = "enterpriseId", default)]
    pub enterprise_id: Option<String>,
    #[serde(rename = "type")]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// RefreshClaims は長命なリフレッシュトークンの Claims を表す。
///
/// `family_id` はログインごとに一度だけ採番され、ローテーションを経ても変わらない。
/// `jti` はトークンごとに採番される識別子。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub iss: String,
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(rename = "familyId")]
    pub family_id: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    /// AuthUser から Claims を組み立てる。
    pub fn for_user(user: &AuthUser, issuer: &str, issued_at: i64, expires_at: i64) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: user.id.clone(),
            email: user.email.clone(),
            admin: user.admin,
            superadmin: user.superadmin,
            enterprise_id: user.enterprise_id.clone(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            iat: issued_at,
            exp: expires_at,
        }
    }

    /// Claims から AuthUser を組み立てる。
    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.sub.clone(),
            email: self.email.clone(),
            admin: self.admin,
            superadmin: self.superadmin,
            enterprise_id: self.enterprise_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> AuthUser {
        AuthUser {
            id: "user-uuid-1234".to_string(),
            email: "taro.yamada@example.com".to_string(),
            admin: false,
            superadmin: true,
            enterprise_id: Some("ent-1".to_string()),
        }
    }

    #[test]
    fn test_access_claims_wire_names() {
        let claims = AccessClaims::for_user(&sample_user(), "workspace", 1_710_000_000, 1_710_000_900);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "user-uuid-1234");
        assert_eq!(json["type"], "access");
        assert_eq!(json["enterpriseId"], "ent-1");
        assert_eq!(json["exp"], 1_710_000_900);
    }

    #[test]
    fn test_access_claims_to_auth_user() {
        let user = sample_user();
        let claims = AccessClaims::for_user(&user, "workspace", 0, 900);
        assert_eq!(claims.to_auth_user(), user);
    }

    #[test]
    fn test_refresh_claims_wire_names() {
        let claims = RefreshClaims {
            iss: "workspace".to_string(),
            sub: "user-1".to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            family_id: "family-1".to_string(),
            jti: "jti-1".to_string(),
            iat: 0,
            exp: 604_800,
        };
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["type"], "refresh");
        assert_eq!(json["familyId"], "family-1");
    }

    #[test]
    fn test_refresh_payload_is_not_access_claims() {
        // email を持たないリフレッシュトークンの payload は AccessClaims として解釈できない
        let json = r#"{
            "iss": "workspace",
            "sub": "user-1",
            "type": "refresh",
            "familyId": "family-1",
            "jti": "jti-1",
            "iat": 0,
            "exp": 604800
        }"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }
}
