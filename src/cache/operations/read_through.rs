use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::store::CacheStore;

/// 读穿透缓存操作
///
/// 先查缓存，未命中再调用 `loader` 查询数据库，并把结果按给定 TTL 写回缓存。
/// 缓存不可用时退化为直接查库；写缓存失败只记录日志，不影响请求。
/// 空结果（`None` 或空列表）不写入缓存。写操作不会使缓存失效，只依赖 TTL 过期。
pub struct ReadThroughCache;

impl ReadThroughCache {
    /// 单个实体查询，键形如 `entity:<id>`
    pub async fn fetch_one<T, E, F, Fut>(
        cache: &dyn CacheStore,
        key: &str,
        ttl_secs: u64,
        loader: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let Some(hit) = Self::lookup::<T>(cache, key).await {
            return Ok(Some(hit));
        }

        let loaded = loader().await?;
        if let Some(value) = &loaded {
            Self::populate(cache, key, value, ttl_secs).await;
        }

        Ok(loaded)
    }

    /// 列表查询，键为固定字面量
    pub async fn fetch_many<T, E, F, Fut>(
        cache: &dyn CacheStore,
        key: &str,
        ttl_secs: u64,
        loader: F,
    ) -> Result<Vec<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if let Some(hit) = Self::lookup::<Vec<T>>(cache, key).await {
            return Ok(hit);
        }

        let loaded = loader().await?;
        if !loaded.is_empty() {
            Self::populate(cache, key, &loaded, ttl_secs).await;
        }

        Ok(loaded)
    }

    async fn lookup<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
        match cache.get(key).await {
            Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
                Ok(value) => {
                    tracing::debug!("Cache hit: {}", key);
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}, falling back to database: {}", key, e);
                None
            }
        }
    }

    async fn populate<T: Serialize + ?Sized>(
        cache: &dyn CacheStore,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };

        match cache.set_ex(key, json, ttl_secs).await {
            Ok(()) => tracing::debug!("Set cache: {} (ttl {}s)", key, ttl_secs),
            Err(e) => tracing::warn!("Failed to populate cache {}: {}", key, e),
        }
    }
}
