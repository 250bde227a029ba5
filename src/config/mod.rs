//! YAML 設定の読み込みとバリデーション。

mod merge;
mod types;

use thiserror::Error;

pub use merge::merge_yaml;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("signing secret is not configured: {0}")]
    MissingSecret(String),
}

/// YAML を読み込み Config を返す。env_path があればマージする。
pub fn load(base_path: &str, env_path: Option<&str>) -> Result<Config, ConfigError> {
    let base = std::fs::read_to_string(base_path)?;
    let mut base_value: serde_yaml::Value = serde_yaml::from_str(&base)?;

    if let Some(env) = env_path {
        let env_data = std::fs::read_to_string(env)?;
        let env_value: serde_yaml::Value = serde_yaml::from_str(&env_data)?;
        merge_yaml(&mut base_value, &env_value);
    }

    let config: Config = serde_yaml::from_value(base_value)?;
    validate(&config)?;
    Ok(config)
}

/// 設定値のバリデーション。
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.app.name.is_empty() {
        return Err(ConfigError::Validation("app.name is required".into()));
    }
    if !["dev", "staging", "prod"].contains(&config.app.environment.as_str()) {
        return Err(ConfigError::Validation(
            "app.environment must be dev, staging, or prod".into(),
        ));
    }
    if config.jwt.issuer.is_empty() {
        return Err(ConfigError::Validation("jwt.issuer is required".into()));
    }
    if config.jwt.access_ttl_secs == 0 || config.jwt.refresh_ttl_secs == 0 {
        return Err(ConfigError::Validation(
            "jwt.access_ttl_secs and jwt.refresh_ttl_secs must be > 0".into(),
        ));
    }
    if config.jwt.refresh_ttl_secs <= config.jwt.access_ttl_secs {
        return Err(ConfigError::Validation(
            "jwt.refresh_ttl_secs must be longer than jwt.access_ttl_secs".into(),
        ));
    }
    if config.jwt.secret_env.is_empty() {
        return Err(ConfigError::Validation("jwt.secret_env is required".into()));
    }
    if config.cookie.access_name.is_empty() || config.cookie.refresh_name.is_empty() {
        return Err(ConfigError::Validation("cookie names are required".into()));
    }
    if config.cookie.access_name == config.cookie.refresh_name {
        return Err(ConfigError::Validation(
            "cookie.access_name and cookie.refresh_name must differ".into(),
        ));
    }
    if config.cookie.same_site == SameSite::None && config.cookie.secure == Some(false) {
        return Err(ConfigError::Validation(
            "cookie.same_site=none requires a secure cookie".into(),
        ));
    }
    Ok(())
}

impl Config {
    /// Cookie に Secure 属性を付与するかを返す。
    pub fn cookie_secure(&self) -> bool {
        self.cookie.secure.unwrap_or_else(|| self.app.is_production())
    }
}
