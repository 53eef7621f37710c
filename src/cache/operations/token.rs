use std::sync::Arc;

use crate::cache::keys::CDEK_TOKEN_KEY;
use crate::cache::models::token::CachedToken;
use crate::cache::store::CacheStore;

/// 令牌缓存操作
///
/// 一个固定键保存一个外部服务的当前令牌，所有实例共享。
#[derive(Clone)]
pub struct TokenCache {
    cache: Arc<dyn CacheStore>,
    key: &'static str,
}

impl TokenCache {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self::with_key(cache, CDEK_TOKEN_KEY)
    }

    pub fn with_key(cache: Arc<dyn CacheStore>, key: &'static str) -> Self {
        Self { cache, key }
    }

    /// 获取令牌缓存，读取失败或内容无法解析时返回 `None`
    pub async fn get(&self) -> Option<CachedToken> {
        let json = match self.cache.get(self.key).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read token cache {}: {}", self.key, e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Discarding unparsable token cache {}: {}", self.key, e);
                None
            }
        }
    }

    /// 缓存令牌，过期时间与令牌有效期一致
    pub async fn save(&self, token: &CachedToken) {
        if token.expires_in <= 0 {
            return;
        }

        let json = match serde_json::to_string(token) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize token for {}: {}", self.key, e);
                return;
            }
        };

        if let Err(e) = self.cache.set_ex(self.key, json, token.expires_in as u64).await {
            tracing::warn!("Failed to save token cache {}: {}", self.key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::memory::MemoryCacheStore;

    fn token(expires_in: i64) -> CachedToken {
        CachedToken {
            access_token: "token-1".into(),
            token_type: "bearer".into(),
            expires_in,
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        }
    }

    #[tokio::test]
    async fn saved_token_is_read_back() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = TokenCache::new(store.clone());
        assert_eq!(cache.get().await, None);

        let saved = token(3600);
        cache.save(&saved).await;

        assert_eq!(cache.get().await, Some(saved));
        assert!(store.get(CDEK_TOKEN_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unparsable_entry_reads_as_absent() {
        let store = Arc::new(MemoryCacheStore::new());
        store.set_ex(CDEK_TOKEN_KEY, "garbage".into(), 60).await.unwrap();

        assert_eq!(TokenCache::new(store).get().await, None);
    }

    #[tokio::test]
    async fn token_without_lifetime_is_not_stored() {
        let store = Arc::new(MemoryCacheStore::new());
        TokenCache::new(store.clone()).save(&token(0)).await;

        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stored_copy_expires_with_the_token() {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = TokenCache::new(store);
        cache.save(&token(10)).await;

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get().await, None);
    }
}
