use serde::Deserialize;

use crate::cache::{CachedToken, TokenCache};
use crate::config::Config;

use super::ProviderError;

const PROVIDER: &str = "cdek token endpoint";

// 令牌有效期上限（秒），超出视为应答异常
const MAX_TOKEN_LIFETIME: i64 = 30 * 24 * 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    expires_in: i64,
}

/// CDEK 访问令牌服务
///
/// 优先使用缓存中的令牌，缺失或过期时用 client credentials 换取新令牌并写回缓存。
/// 并发请求可能同时判定过期并各自刷新，最后一次写入生效，令牌之间可以互换。
#[derive(Clone)]
pub struct TokenService {
    token_cache: TokenCache,
    http: reqwest::Client,
    token_url: String,
    grant_type: String,
    client_id: String,
    client_secret: String,
}

impl TokenService {
    pub fn new(token_cache: TokenCache, http: reqwest::Client, config: &Config) -> Self {
        Self {
            token_cache,
            http,
            token_url: format!("{}/v2/oauth/token", config.cdek_endpoint.trim_end_matches('/')),
            grant_type: config.cdek_grant_type.clone(),
            client_id: config.cdek_client_id.clone(),
            client_secret: config.cdek_client_secret.clone(),
        }
    }

    /// 获取有效令牌，必要时刷新
    pub async fn get_valid_token(&self) -> Result<String, ProviderError> {
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = self.token_cache.get().await {
            if !token.is_expired(now) {
                return Ok(token.access_token);
            }
            tracing::debug!("Cached CDEK token expired at {}", token.expires_at);
        }

        let token = self.fetch_new_token().await?;
        self.token_cache.save(&token).await;

        Ok(token.access_token)
    }

    async fn fetch_new_token(&self) -> Result<CachedToken, ProviderError> {
        tracing::info!("Fetching new CDEK token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", self.grant_type.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("CDEK token endpoint returned {}", status);
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status,
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        if body.expires_in <= 0 || body.expires_in > MAX_TOKEN_LIFETIME {
            tracing::error!("CDEK token endpoint returned expires_in {}", body.expires_in);
            return Err(ProviderError::Decode {
                provider: PROVIDER,
                message: format!("expires_in {} out of range", body.expires_in),
            });
        }

        Ok(CachedToken {
            access_token: body.access_token,
            token_type: body.token_type,
            expires_in: body.expires_in,
            expires_at: chrono::Utc::now()
                .timestamp()
                .saturating_add(body.expires_in),
        })
    }
}
