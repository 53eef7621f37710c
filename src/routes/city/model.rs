use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::cache::{CacheStore, ReadThroughCache, keys};

/// 对外只暴露 CDEK 城市代码和名称
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct City {
    pub code: i32,
    pub name: String,
}

impl City {
    pub async fn find_all(
        pool: &PgPool,
        cache: &dyn CacheStore,
        ttl: u64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        ReadThroughCache::fetch_many(cache, keys::CITIES_KEY, ttl, || async move {
            sqlx::query_as::<_, City>("SELECT code, name FROM cities ORDER BY sequence")
                .fetch_all(pool)
                .await
        })
        .await
    }
}
