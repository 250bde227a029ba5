use secrecy::{ExposeSecret, Secret};

use crate::config::ConfigError;

/// HS256 署名鍵として受け入れる最小バイト長。
pub const MIN_SECRET_LEN: usize = 32;

/// SecretProvider はトークン署名鍵の取得を抽象化する。
///
/// 鍵が設定されていない状態は起動時の致命的エラーであり、
/// TokenCodec の生成時に一度だけ解決される。
pub trait SecretProvider: Send + Sync {
    fn signing_secret(&self) -> Result<Secret<String>, ConfigError>;
}

/// EnvSecretProvider は環境変数から署名鍵を読み取る。
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    var_name: String,
}

impl EnvSecretProvider {
    pub fn new(var_name: &str) -> Self {
        Self {
            var_name: var_name.to_string(),
        }
    }
}

impl SecretProvider for EnvSecretProvider {
    fn signing_secret(&self) -> Result<Secret<String>, ConfigError> {
        let value = std::env::var(&self.var_name)
            .map_err(|_| ConfigError::MissingSecret(format!("{} is not set", self.var_name)))?;
        check_secret(Secret::new(value), &self.var_name)
    }
}

/// StaticSecretProvider は固定の署名鍵を返す。テストや鍵ローテーションの検証に使用する。
pub struct StaticSecretProvider {
    secret: Secret<String>,
}

impl StaticSecretProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
        }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn signing_secret(&self) -> Result<Secret<String>, ConfigError> {
        check_secret(Secret::new(self.secret.expose_secret().clone()), "static secret")
    }
}

fn check_secret(secret: Secret<String>, source: &str) -> Result<Secret<String>, ConfigError> {
    let len = secret.expose_secret().len();
    if len == 0 {
        return Err(ConfigError::MissingSecret(format!("{source} is empty")));
    }
    if len < MIN_SECRET_LEN {
        return Err(ConfigError::Validation(format!(
            "{source} must be at least {MIN_SECRET_LEN} bytes"
        )));
    }
    Ok(secret)
}
