//! アクセストークン / リフレッシュトークンの発行と検証。

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::{ConfigError, JwtConfig};
use crate::domain::entity::auth_user::AuthUser;
use crate::domain::entity::claims::{
    AccessClaims, RefreshClaims, ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE,
};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::secret_provider::SecretProvider;

/// TokenError はトークン処理のエラーを表す。
///
/// 検証失敗は理由を問わず InvalidToken に集約する。
/// どのチェックで失敗したかを呼び出し元に漏らさない。
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// IssuedRefreshToken は発行したリフレッシュトークンとそのファミリー ID。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub family_id: String,
}

/// RefreshIdentity は検証済みリフレッシュトークンから取り出した識別情報。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshIdentity {
    pub user_id: String,
    pub family_id: String,
}

/// TokenCodec は HS256 署名付きトークンを発行・検証する。
///
/// 署名鍵は生成時に SecretProvider から一度だけ解決してキャッシュする。
/// 時刻は注入された Clock から取得するため、有効期限の判定も Clock 基準で行う。
pub struct TokenCodec {
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// 新しい TokenCodec を生成する。署名鍵が解決できない場合は起動を中止すべきエラーを返す。
    pub fn new(
        config: &JwtConfig,
        secrets: &dyn SecretProvider,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let secret = secrets.signing_secret()?;
        let key_bytes = secret.expose_secret().as_bytes();

        let access_ttl_secs = i64::try_from(config.access_ttl_secs)
            .map_err(|_| ConfigError::Validation("jwt.access_ttl_secs is too large".into()))?;
        let refresh_ttl_secs = i64::try_from(config.refresh_ttl_secs)
            .map_err(|_| ConfigError::Validation("jwt.refresh_ttl_secs is too large".into()))?;

        Ok(Self {
            issuer: config.issuer.clone(),
            access_ttl_secs,
            refresh_ttl_secs,
            encoding_key: EncodingKey::from_secret(key_bytes),
            decoding_key: DecodingKey::from_secret(key_bytes),
            clock,
        })
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    /// アクセストークンを発行する。有効期限は now + access_ttl。
    pub fn issue_access(&self, user: &AuthUser) -> Result<String, TokenError> {
        let now = self.clock.now().timestamp();
        let exp = expires_at(now, self.access_ttl_secs)?;
        let claims = AccessClaims::for_user(user, &self.issuer, now, exp);
        self.sign(&claims)
    }

    /// リフレッシュトークンを発行する。
    /// family_id を省略した場合は新しいログインとして新規に採番し、指定された場合はそのまま引き継ぐ。
    pub fn issue_refresh(
        &self,
        user_id: &str,
        family_id: Option<&str>,
    ) -> Result<IssuedRefreshToken, TokenError> {
        let family_id = family_id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let now = self.clock.now().timestamp();
        let exp = expires_at(now, self.refresh_ttl_secs)?;
        let claims = RefreshClaims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            family_id: family_id.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp,
        };
        let token = self.sign(&claims)?;
        Ok(IssuedRefreshToken { token, family_id })
    }

    /// アクセストークンを検証し、AuthUser を返す。
    pub fn verify_access(&self, token: &str) -> Result<AuthUser, TokenError> {
        let claims: AccessClaims = self.decode_checked(token)?;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            tracing::debug!(token_type = %claims.token_type, "access token rejected: unexpected type");
            return Err(TokenError::InvalidToken);
        }
        if claims.sub.is_empty() || claims.email.is_empty() {
            tracing::debug!("access token rejected: missing subject or email");
            return Err(TokenError::InvalidToken);
        }
        self.check_expiry(claims.exp)?;

        Ok(claims.to_auth_user())
    }

    /// リフレッシュトークンを検証し、ユーザー ID とファミリー ID を返す。
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshIdentity, TokenError> {
        let claims: RefreshClaims = self.decode_checked(token)?;

        if claims.token_type != REFRESH_TOKEN_TYPE {
            tracing::debug!(token_type = %claims.token_type, "refresh token rejected: unexpected type");
            return Err(TokenError::InvalidToken);
        }
        if claims.sub.is_empty() || claims.family_id.is_empty() {
            tracing::debug!("refresh token rejected: missing subject or family");
            return Err(TokenError::InvalidToken);
        }
        self.check_expiry(claims.exp)?;

        Ok(RefreshIdentity {
            user_id: claims.sub,
            family_id: claims.family_id,
        })
    }

    fn sign<T: serde::Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// 署名と issuer を検証して Claims をデコードする。
    /// 有効期限は Clock 基準で別途判定するため、ここではライブラリ側の exp 検証を無効にする。
    fn decode_checked<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token verification failed");
                TokenError::InvalidToken
            })
    }

    fn check_expiry(&self, exp: i64) -> Result<(), TokenError> {
        if exp <= self.clock.now().timestamp() {
            tracing::debug!("token rejected: expired");
            return Err(TokenError::InvalidToken);
        }
        Ok(())
    }
}

fn expires_at(now: i64, ttl_secs: i64) -> Result<i64, TokenError> {
    now.checked_add(ttl_secs)
        .ok_or_else(|| TokenError::Signing("token lifetime overflows the expiry timestamp".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::secret_provider::StaticSecretProvider;
    use chrono::{DateTime, Duration};

    const TEST_ISSUER: &str = "https://workspace.example.com";
    const TEST_SECRET: &str = "test-signing-secret-0123456789abcdef";
    const OTHER_SECRET: &str = "another-signing-secret-0123456789abcd";

    fn make_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            DateTime::from_timestamp(1_710_000_000, 0).unwrap(),
        ))
    }

    fn make_codec_with(secret: &str, issuer: &str, clock: Arc<FixedClock>) -> TokenCodec {
        TokenCodec::new(
            &JwtConfig::new(issuer),
            &StaticSecretProvider::new(secret),
            clock,
        )
        .unwrap()
    }

    fn make_codec(clock: Arc<FixedClock>) -> TokenCodec {
        make_codec_with(TEST_SECRET, TEST_ISSUER, clock)
    }

    fn sample_user() -> AuthUser {
        AuthUser {
            id: "user-uuid-1234".to_string(),
            email: "taro.yamada@example.com".to_string(),
            admin: true,
            superadmin: false,
            enterprise_id: Some("ent-1".to_string()),
        }
    }

    fn sign_raw<T: serde::Serialize>(claims: &T, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_fails_without_secret() {
        let result = TokenCodec::new(
            &JwtConfig::new(TEST_ISSUER),
            &StaticSecretProvider::new(""),
            make_clock(),
        );
        assert!(matches!(result, Err(ConfigError::MissingSecret(_))));
    }

    // --- access token ---

    #[test]
    fn test_access_roundtrip_preserves_identity() {
        let codec = make_codec(make_clock());
        let user = sample_user();

        let token = codec.issue_access(&user).unwrap();
        let verified = codec.verify_access(&token).unwrap();

        assert_eq!(verified, user);
    }

    #[test]
    fn test_access_expires_after_fifteen_minutes() {
        let clock = make_clock();
        let codec = make_codec(clock.clone());
        let token = codec.issue_access(&sample_user()).unwrap();

        clock.advance(Duration::minutes(14));
        assert!(codec.verify_access(&token).is_ok());

        clock.advance(Duration::minutes(1));
        assert!(matches!(
            codec.verify_access(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_rejects_wrong_signature() {
        let clock = make_clock();
        let issuer_codec = make_codec_with(OTHER_SECRET, TEST_ISSUER, clock.clone());
        let codec = make_codec(clock);

        let token = issuer_codec.issue_access(&sample_user()).unwrap();
        assert!(matches!(
            codec.verify_access(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_rejects_wrong_issuer() {
        let clock = make_clock();
        let foreign = make_codec_with(TEST_SECRET, "https://evil.example.com", clock.clone());
        let codec = make_codec(clock);

        let token = foreign.issue_access(&sample_user()).unwrap();
        assert!(matches!(
            codec.verify_access(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_rejects_tampered_payload() {
        let codec = make_codec(make_clock());
        let token = codec.issue_access(&sample_user()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let other = codec
            .issue_access(&AuthUser {
                superadmin: true,
                ..sample_user()
            })
            .unwrap();
        parts[1] = other.split('.').nth(1).unwrap().to_string();
        let forged = parts.join(".");

        assert!(codec.verify_access(&forged).is_err());
    }

    #[test]
    fn test_access_rejects_garbage() {
        let codec = make_codec(make_clock());
        assert!(codec.verify_access("not-a-jwt").is_err());
        assert!(codec.verify_access("").is_err());
    }

    #[test]
    fn test_access_rejects_type_refresh() {
        let clock = make_clock();
        let codec = make_codec(clock.clone());
        let now = clock.now().timestamp();

        let mut claims = AccessClaims::for_user(&sample_user(), TEST_ISSUER, now, now + 900);
        claims.token_type = "refresh".to_string();
        let token = sign_raw(&claims, TEST_SECRET);

        assert!(matches!(
            codec.verify_access(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_rejects_refresh_token() {
        let codec = make_codec(make_clock());
        let refresh = codec.issue_refresh("user-uuid-1234", None).unwrap();

        assert!(matches!(
            codec.verify_access(&refresh.token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_rejects_missing_email() {
        let clock = make_clock();
        let codec = make_codec(clock.clone());
        let now = clock.now().timestamp();

        let token = sign_raw(
            &serde_json::json!({
                "iss": TEST_ISSUER,
                "sub": "user-1",
                "type": "access",
                "iat": now,
                "exp": now + 900,
            }),
            TEST_SECRET,
        );
        assert!(codec.verify_access(&token).is_err());

        let token = sign_raw(
            &serde_json::json!({
                "iss": TEST_ISSUER,
                "sub": "user-1",
                "email": "",
                "type": "access",
                "iat": now,
                "exp": now + 900,
            }),
            TEST_SECRET,
        );
        assert!(codec.verify_access(&token).is_err());
    }

    // --- refresh token ---

    #[test]
    fn test_refresh_new_family_is_minted() {
        let codec = make_codec(make_clock());
        let first = codec.issue_refresh("user-1", None).unwrap();
        let second = codec.issue_refresh("user-1", None).unwrap();

        assert!(!first.family_id.is_empty());
        assert_ne!(first.family_id, second.family_id);
    }

    #[test]
    fn test_refresh_explicit_family_is_kept() {
        let codec = make_codec(make_clock());
        let issued = codec.issue_refresh("user-1", Some("family-abc")).unwrap();
        assert_eq!(issued.family_id, "family-abc");

        let identity = codec.verify_refresh(&issued.token).unwrap();
        assert_eq!(
            identity,
            RefreshIdentity {
                user_id: "user-1".to_string(),
                family_id: "family-abc".to_string(),
            }
        );
    }

    #[test]
    fn test_refresh_tokens_are_unique_within_family() {
        let codec = make_codec(make_clock());
        let first = codec.issue_refresh("user-1", Some("family-abc")).unwrap();
        let second = codec.issue_refresh("user-1", Some("family-abc")).unwrap();
        // 同一時刻でも jti が異なるためトークン文字列は一致しない
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_refresh_expires_after_seven_days() {
        let clock = make_clock();
        let codec = make_codec(clock.clone());
        let issued = codec.issue_refresh("user-1", None).unwrap();

        clock.advance(Duration::days(7) - Duration::seconds(1));
        assert!(codec.verify_refresh(&issued.token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(codec.verify_refresh(&issued.token).is_err());
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let codec = make_codec(make_clock());
        let access = codec.issue_access(&sample_user()).unwrap();

        assert!(matches!(
            codec.verify_refresh(&access),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_rejects_wrong_type_claim() {
        let clock = make_clock();
        let codec = make_codec(clock.clone());
        let now = clock.now().timestamp();

        let claims = RefreshClaims {
            iss: TEST_ISSUER.to_string(),
            sub: "user-1".to_string(),
            token_type: "access".to_string(),
            family_id: "family-1".to_string(),
            jti: "jti-1".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = sign_raw(&claims, TEST_SECRET);

        assert!(codec.verify_refresh(&token).is_err());
    }

    #[test]
    fn test_refresh_rejects_wrong_signature() {
        let clock = make_clock();
        let foreign = make_codec_with(OTHER_SECRET, TEST_ISSUER, clock.clone());
        let codec = make_codec(clock);

        let issued = foreign.issue_refresh("user-1", None).unwrap();
        assert!(codec.verify_refresh(&issued.token).is_err());
    }

    #[test]
    fn test_overflowing_lifetime_is_rejected() {
        let mut config = JwtConfig::new(TEST_ISSUER);
        config.access_ttl_secs = i64::MAX as u64;
        config.refresh_ttl_secs = i64::MAX as u64;
        let codec = TokenCodec::new(&config, &StaticSecretProvider::new(TEST_SECRET), make_clock())
            .unwrap();

        assert!(matches!(
            codec.issue_access(&sample_user()),
            Err(TokenError::Signing(_))
        ));
        assert!(matches!(
            codec.issue_refresh("user-uuid-1234", None),
            Err(TokenError::Signing(_))
        ));
    }
}
