use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

const DEFAULT_MAX_USES: i32 = 1000;
const DEFAULT_VALID_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromoCode {
    pub id: i32,
    pub code: String,
    pub user_id: i32,
    pub discount_type: String,
    pub discount_value: i32,
    pub max_uses: i32,
    pub used_count: i32,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 促销码及其所属用户的邮箱
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromoCodeWithEmail {
    pub id: i32,
    pub code: String,
    pub discount_type: String,
    pub discount_value: i32,
    pub valid_until: DateTime<Utc>,
    pub used_count: i32,
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePromoCodeRequest {
    pub user_id: i32,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i32,
    #[serde(default)]
    pub max_uses: Option<i32>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
}

impl CreatePromoCodeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("code must not be empty".into());
        }
        if self.discount_value <= 0 {
            return Err("discount_value must be positive".into());
        }
        if self.discount_type == DiscountType::Percentage && self.discount_value > 100 {
            return Err("percentage discount cannot exceed 100".into());
        }
        if matches!(self.max_uses, Some(n) if n <= 0) {
            return Err("max_uses must be positive".into());
        }
        Ok(())
    }
}

const JOINED_SELECT: &str = r#"
    SELECT p.id, p.code, p.discount_type, p.discount_value, p.valid_until, p.used_count,
           u.email AS user_email
    FROM promo_codes p
    JOIN users u ON u.id = p.user_id
"#;

impl PromoCode {
    pub async fn create(pool: &PgPool, req: CreatePromoCodeRequest) -> Result<Self, sqlx::Error> {
        let valid_until = req
            .valid_until
            .unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_VALID_DAYS));

        sqlx::query_as::<_, PromoCode>(
            r#"
            INSERT INTO promo_codes (code, user_id, discount_type, discount_value, max_uses, valid_until)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, code, user_id, discount_type, discount_value, max_uses, used_count,
                      valid_until, created_at
            "#,
        )
        .bind(req.code.trim())
        .bind(req.user_id)
        .bind(req.discount_type.as_str())
        .bind(req.discount_value)
        .bind(req.max_uses.unwrap_or(DEFAULT_MAX_USES))
        .bind(valid_until)
        .fetch_one(pool)
        .await
    }

    pub async fn find_all_with_email(
        pool: &PgPool,
    ) -> Result<Vec<PromoCodeWithEmail>, sqlx::Error> {
        sqlx::query_as::<_, PromoCodeWithEmail>(&format!("{} ORDER BY p.id", JOINED_SELECT))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<PromoCodeWithEmail>, sqlx::Error> {
        sqlx::query_as::<_, PromoCodeWithEmail>(&format!("{} WHERE p.code = $1", JOINED_SELECT))
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}
