use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::cache::{CacheStore, ReadThroughCache, keys};
use crate::services::payment::CheckoutIn;

const REQUEST_COLUMNS: &str = r#"
    id, amount, bug, city, zip, address, first_name, last_name, phone, email,
    status, payment_id, token, promo_code_id, created_at
"#;

/// 订单
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Request {
    pub id: i32,
    pub amount: i32,
    /// 收据商品明细的 JSON
    pub bug: String,
    pub city: String,
    pub zip: Option<String>,
    pub address: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub status: String,
    pub payment_id: Option<String>,
    pub token: Option<String>,
    pub promo_code_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// 新建订单所需字段
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub amount: i32,
    pub bug: String,
    pub city: String,
    pub zip: String,
    pub address: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub promo_code_id: Option<i32>,
}

impl TryFrom<&CheckoutIn> for NewRequest {
    type Error = serde_json::Error;

    fn try_from(checkout: &CheckoutIn) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: checkout.amount,
            bug: serde_json::to_string(&checkout.receipt.items)?,
            city: checkout.city.clone(),
            zip: checkout.zip.clone(),
            address: checkout.address.clone(),
            first_name: checkout.first_name.clone(),
            last_name: checkout.last_name.clone(),
            phone: checkout.phone.clone(),
            email: checkout.email.clone(),
            promo_code_id: checkout.promo_code_id,
        })
    }
}

impl Request {
    pub async fn create(pool: &PgPool, req: NewRequest) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Request>(&format!(
            r#"
            INSERT INTO requests
                (amount, bug, city, zip, address, first_name, last_name, phone, email, promo_code_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(req.amount)
        .bind(req.bug)
        .bind(req.city)
        .bind(req.zip)
        .bind(req.address)
        .bind(req.first_name)
        .bind(req.last_name)
        .bind(req.phone)
        .bind(req.email)
        .bind(req.promo_code_id)
        .fetch_one(pool)
        .await
    }

    /// 支付网关应答后回写签名和支付号
    pub async fn set_payment(
        pool: &PgPool,
        id: i32,
        token: &str,
        payment_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE requests SET token = $1, payment_id = $2 WHERE id = $3")
            .bind(token)
            .bind(payment_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// 全部订单，新的在前
    pub async fn find_all(
        pool: &PgPool,
        cache: &dyn CacheStore,
        ttl: u64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        ReadThroughCache::fetch_many(cache, keys::REQUESTS_KEY, ttl, || async move {
            sqlx::query_as::<_, Request>(&format!(
                "SELECT {} FROM requests ORDER BY created_at DESC",
                REQUEST_COLUMNS
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
        ReadThroughCache::fetch_one(cache, &keys::request_key(id), ttl, || async move {
            sqlx::query_as::<_, Request>(&format!(
                "SELECT {} FROM requests WHERE id = $1",
                REQUEST_COLUMNS
            ))
            .bind(id)
            .fetch_optional(pool)
            .await
        })
        .await
    }
}
