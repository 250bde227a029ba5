//! アクセストークン / リフレッシュトークンのペアを保持するセッションストア。

use http::header::COOKIE;
use http::HeaderMap;

use crate::config::{Config, CookieConfig, SameSite};
use crate::infrastructure::token_codec::TokenCodec;

/// SessionTokens はセッションから読み取ったトークンペア。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// SessionStore は Cookie やヘッダーなど呼び出し側のトランスポートへの境界。
/// ロジックは持たず、トークンペアの読み書きだけを行う。
pub trait SessionStore: Send {
    fn read(&self) -> SessionTokens;
    fn write(&mut self, access_token: &str, refresh_token: &str);
    fn clear(&mut self);
}

/// InMemorySessionStore はメモリ上にトークンペアを保持する実装。
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    tokens: SessionTokens,
    write_count: usize,
    clear_count: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定のトークンを持つセッションを生成する。
    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        Self {
            tokens: SessionTokens {
                access_token: access_token.map(str::to_string),
                refresh_token: refresh_token.map(str::to_string),
            },
            ..Self::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl SessionStore for InMemorySessionStore {
    fn read(&self) -> SessionTokens {
        self.tokens.clone()
    }

    fn write(&mut self, access_token: &str, refresh_token: &str) {
        self.tokens = SessionTokens {
            access_token: Some(access_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
        };
        self.write_count += 1;
    }

    fn clear(&mut self) {
        self.tokens = SessionTokens::default();
        self.clear_count += 1;
    }
}

/// CookieSettings はセッション Cookie の属性。
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub access_name: String,
    pub refresh_name: String,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
    pub access_max_age_secs: i64,
    pub refresh_max_age_secs: i64,
}

impl CookieSettings {
    /// Max-Age は各トークンの有効期限に合わせる。
    pub fn new(
        cookie: &CookieConfig,
        secure: bool,
        access_max_age_secs: i64,
        refresh_max_age_secs: i64,
    ) -> Self {
        Self {
            access_name: cookie.access_name.clone(),
            refresh_name: cookie.refresh_name.clone(),
            path: cookie.path.clone(),
            same_site: cookie.same_site,
            secure,
            access_max_age_secs,
            refresh_max_age_secs,
        }
    }

    /// 設定から生成する。Secure は Config::cookie_secure、Max-Age は TokenCodec の有効期限に従う。
    pub fn from_config(config: &Config, codec: &TokenCodec) -> Self {
        Self::new(
            &config.cookie,
            config.cookie_secure(),
            codec.access_ttl_secs(),
            codec.refresh_ttl_secs(),
        )
    }

    fn set_cookie(&self, name: &str, value: &str, max_age_secs: i64) -> String {
        let mut directive = format!(
            "{name}={value}; Path={}; Max-Age={max_age_secs}; HttpOnly; SameSite={}",
            self.path,
            self.same_site.as_str(),
        );
        if self.secure {
            directive.push_str("; Secure");
        }
        directive
    }
}

/// CookieSessionStore はリクエストの Cookie ヘッダーからトークンを読み取り、
/// 書き込みと削除をレスポンス用の Set-Cookie ディレクティブとして蓄積する。
#[derive(Debug, Clone)]
pub struct CookieSessionStore {
    settings: CookieSettings,
    tokens: SessionTokens,
    set_cookies: Vec<String>,
}

impl CookieSessionStore {
    pub fn from_headers(settings: CookieSettings, headers: &HeaderMap) -> Self {
        let mut tokens = SessionTokens::default();
        for (name, value) in headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parse_cookie_header)
        {
            if value.is_empty() {
                continue;
            }
            if name == settings.access_name {
                tokens.access_token = Some(value.to_string());
            } else if name == settings.refresh_name {
                tokens.refresh_token = Some(value.to_string());
            }
        }

        Self {
            settings,
            tokens,
            set_cookies: Vec::new(),
        }
    }

    /// 蓄積された Set-Cookie ディレクティブを取り出す。
    pub fn take_set_cookies(&mut self) -> Vec<String> {
        std::mem::take(&mut self.set_cookies)
    }
}

impl SessionStore for CookieSessionStore {
    fn read(&self) -> SessionTokens {
        self.tokens.clone()
    }

    fn write(&mut self, access_token: &str, refresh_token: &str) {
        self.set_cookies.push(self.settings.set_cookie(
            &self.settings.access_name,
            access_token,
            self.settings.access_max_age_secs,
        ));
        self.set_cookies.push(self.settings.set_cookie(
            &self.settings.refresh_name,
            refresh_token,
            self.settings.refresh_max_age_secs,
        ));
        self.tokens = SessionTokens {
            access_token: Some(access_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
        };
    }

    fn clear(&mut self) {
        self.set_cookies
            .push(self.settings.set_cookie(&self.settings.access_name, "", 0));
        self.set_cookies
            .push(self.settings.set_cookie(&self.settings.refresh_name, "", 0));
        self.tokens = SessionTokens::default();
    }
}

/// Cookie ヘッダー値を name=value の組に分解する。
fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        Some((name.trim(), value.trim().trim_matches('"')))
    })
}
