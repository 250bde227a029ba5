use serde::Deserialize;

/// Config は認証コンポーネント全体の設定を表す。
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "prod"
    }
}

fn default_environment() -> String {
    "dev".to_string()
}

/// JwtConfig はトークンの発行・検証に関する設定を表す。
/// 署名鍵そのものは保持せず、読み取る環境変数名だけを持つ。
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl JwtConfig {
    /// デフォルトの有効期限（アクセス 15 分、リフレッシュ 7 日）で生成する。
    pub fn new(issuer: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            access_ttl_secs: default_access_ttl_secs(),
            refresh_ttl_secs: default_refresh_ttl_secs(),
            secret_env: default_secret_env(),
        }
    }
}

fn default_access_ttl_secs() -> u64 {
    15 * 60
}

fn default_refresh_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_secret_env() -> String {
    "AUTH_JWT_SECRET".to_string()
}

/// CookieConfig はセッション Cookie の属性を表す。
#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    #[serde(default = "default_access_name")]
    pub access_name: String,
    #[serde(default = "default_refresh_name")]
    pub refresh_name: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub same_site: SameSite,
    /// 未指定の場合は app.environment が prod のときだけ Secure を付与する。
    #[serde(default)]
    pub secure: Option<bool>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_name: default_access_name(),
            refresh_name: default_refresh_name(),
            path: default_path(),
            same_site: SameSite::default(),
            secure: None,
        }
    }
}

fn default_access_name() -> String {
    "access_token".to_string()
}

fn default_refresh_name() -> String {
    "refresh_token".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

/// SameSite は Cookie の SameSite 属性を表す。
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// LogConfig はログ出力の設定を表す。
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" の場合はプレーンテキスト、それ以外は JSON。
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}
