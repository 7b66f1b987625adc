/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, JWT_SECRET, JWT_ALGORITHMS, メッセージ上書きなど)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::services::auth::AuthOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt_secret: String,
    pub jwt_algorithms: Vec<Algorithm>,
    pub jwt_leeway_seconds: u64,

    pub invalid_auth_header_message: Option<String>,
    pub no_auth_header_message: Option<String>,
    pub token_expire_message: Option<String>,
    pub token_failure_message: Option<String>,

    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_algorithms", &self.jwt_algorithms)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = get("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        // PEM keys are often passed with escaped newlines
        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?
            .replace("\\n", "\n");

        let jwt_algorithms = get("JWT_ALGORITHMS")
            .unwrap_or_else(|| "HS256".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Algorithm::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::Invalid("JWT_ALGORITHMS"))?;

        if jwt_algorithms.is_empty() {
            return Err(ConfigError::Invalid("JWT_ALGORITHMS"));
        }

        let jwt_leeway_seconds = get("JWT_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let body_limit_bytes = get("HTTP_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let request_timeout_seconds = get("HTTP_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            jwt_algorithms,
            jwt_leeway_seconds,
            invalid_auth_header_message: get("AUTH_INVALID_HEADER_MESSAGE"),
            no_auth_header_message: get("AUTH_NO_HEADER_MESSAGE"),
            token_expire_message: get("AUTH_TOKEN_EXPIRE_MESSAGE"),
            token_failure_message: get("AUTH_TOKEN_FAILURE_MESSAGE"),
            body_limit_bytes,
            request_timeout_seconds,
        })
    }

    pub fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            invalid_authentication_header_message: self.invalid_auth_header_message.clone(),
            no_authentication_header_message: self.no_auth_header_message.clone(),
            token_expire_message: self.token_expire_message.clone(),
            token_failure_verification_message: self.token_failure_message.clone(),
            ..AuthOptions::new(self.jwt_secret.clone(), self.jwt_algorithms.iter().copied())
        }
        .with_leeway_seconds(self.jwt_leeway_seconds)
    }
}
