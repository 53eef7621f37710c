use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// 运费计算时询价的 CDEK 资费
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Tariff {
    pub code: u32,
    pub name: String,
}

const DEFAULT_TARIFFS: &str = "136:Посылка склад-склад,137:Посылка склад-дверь";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub cors_origins: Vec<String>,
    // CDEK
    pub cdek_endpoint: String,
    pub cdek_grant_type: String,
    pub cdek_client_id: String,
    pub cdek_client_secret: String,
    pub cdek_from_city: i64,
    pub cdek_tariffs: Vec<Tariff>,
    // Tinkoff
    pub tinkoff_url: String,
    pub terminal_key: String,
    pub terminal_pwd: String,
    pub terminal_desc: String,
    // Email
    pub smtp_host: String,
    pub smtp_port: u16,
    pub email_from: String,
    pub email_pwd: String,
    pub email_to: String,
    pub provider_timeout_secs: u64,
    // 缓存过期时间，单位秒
    pub products_cache_ttl: u64,
    pub cities_cache_ttl: u64,
    pub requests_cache_ttl: u64,
    pub user_cache_ttl: u64,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn optional<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// 解析逗号分隔的 `code:name` 列表
pub fn parse_tariffs(raw: &str) -> Result<Vec<Tariff>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || ConfigError::Invalid {
                key: "CDEK_TARIFFS",
                value: entry.to_string(),
            };
            let (code, name) = entry.split_once(':').ok_or_else(invalid)?;
            Ok(Tariff {
                code: code.trim().parse().map_err(|_| invalid())?,
                name: name.trim().to_string(),
            })
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.trim_end_matches('h').parse::<u64>().ok())
            .unwrap_or(24);
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        let tariffs = env::var("CDEK_TARIFFS").unwrap_or_else(|_| DEFAULT_TARIFFS.to_string());

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            db_max_connections: optional("DB_MAX_CONNECTIONS", 10)?,
            redis_url: required("REDIS_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration * 3600,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: optional("SERVER_PORT", 8000)?,
            api_base_uri: env::var("API_BASE_URI").unwrap_or_default(),
            cors_origins,
            cdek_endpoint: required("CDEK_ENDPOINT")?,
            cdek_grant_type: env::var("CDEK_GRANT_TYPE")
                .unwrap_or_else(|_| "client_credentials".into()),
            cdek_client_id: required("CDEK_CLIENT_ID")?,
            cdek_client_secret: required("CDEK_CLIENT_SECRET")?,
            cdek_from_city: optional("CDEK_FROM_CITY", 137)?,
            cdek_tariffs: parse_tariffs(&tariffs)?,
            tinkoff_url: required("TINKOFF_URL")?,
            terminal_key: required("TERMINAL_KEY")?,
            terminal_pwd: required("TERMINAL_PWD")?,
            terminal_desc: env::var("TERMINAL_DESC").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            smtp_port: optional("SMTP_PORT", 587)?,
            email_from: required("EMAIL_FROM")?,
            email_pwd: required("EMAIL_PWD")?,
            email_to: required("EMAIL_TO")?,
            provider_timeout_secs: optional("PROVIDER_TIMEOUT", 30)?,
            products_cache_ttl: optional("PRODUCTS_CACHE_TTL", 3600)?,
            cities_cache_ttl: optional("CITIES_CACHE_TTL", 86400)?,
            requests_cache_ttl: optional("REQUESTS_CACHE_TTL", 300)?,
            user_cache_ttl: optional("USER_CACHE_TTL", 900)?,
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}
