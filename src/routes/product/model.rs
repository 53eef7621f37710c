use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::cache::{CacheStore, ReadThroughCache, keys};

const PRODUCT_COLUMNS: &str = r#"
    id, name, product_id, product_type, description, image, images,
    catalog_img, catalog_hover_img, price, supply, waiting, sequence,
    published, display_on_main, color, weight, height, length, width
"#;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub product_id: String,
    pub product_type: Option<String>,
    pub description: String,
    pub image: Option<String>,
    pub images: Option<String>,
    pub catalog_img: Option<String>,
    pub catalog_hover_img: Option<String>,
    pub price: i32,
    pub supply: i32,
    pub waiting: i32,
    pub sequence: i32,
    pub published: i32,
    pub display_on_main: i32,
    pub color: Option<String>,
    pub weight: i32,
    pub height: i32,
    pub length: i32,
    pub width: i32,
}

impl Product {
    /// 已发布商品，按 `sequence` 排序
    pub async fn find_published(
        pool: &PgPool,
        cache: &dyn CacheStore,
        ttl: u64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        ReadThroughCache::fetch_many(cache, keys::PRODUCTS_KEY, ttl, || async move {
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE published = 1 ORDER BY sequence",
                PRODUCT_COLUMNS
            ))
            .fetch_all(pool)
            .await
        })
        .await
    }

    /// 首页展示的商品
    pub async fn find_to_display(
        pool: &PgPool,
        cache: &dyn CacheStore,
        ttl: u64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        ReadThroughCache::fetch_many(cache, keys::PRODUCTS_TO_DISPLAY_KEY, ttl, || async move {
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE display_on_main = 1 ORDER BY sequence",
                PRODUCT_COLUMNS
            ))
            .fetch_all(pool)
            .await
        })
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        cache: &dyn CacheStore,
        ttl: u64,
        id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        ReadThroughCache::fetch_one(cache, &keys::product_key(id), ttl, || async move {
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE id = $1",
                PRODUCT_COLUMNS
            ))
            .bind(id)
            .fetch_optional(pool)
            .await
        })
        .await
    }
}
