use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::cache::{CacheStore, ReadThroughCache, keys};

const USER_OUT_COLUMNS: &str =
    "id, email, first_name, last_name, phone, admin, is_verified, created_at";

/// 带密码哈希的完整用户记录，只在登录时使用
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i32,
    pub password: String,
    pub admin: i32,
}

/// 对外的用户信息，不含密码
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct UserOut {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub admin: i32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// 登录表单，`username` 填邮箱
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

impl User {
    pub async fn create(
        pool: &PgPool,
        req: CreateUserRequest,
        password_hash: String,
    ) -> Result<UserOut, sqlx::Error> {
        sqlx::query_as::<_, UserOut>(&format!(
            r#"
            INSERT INTO users (email, password, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_OUT_COLUMNS
        ))
        .bind(req.email)
        .bind(password_hash)
        .bind(req.first_name)
        .bind(req.last_name)
        .bind(req.phone)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, password, admin FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}

impl UserOut {
    pub fn is_admin(&self) -> bool {
        self.admin != 0
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserOut>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_OUT_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    /// 按 ID 查询，经 `user:<id>` 缓存
    pub async fn find_by_id(
        pool: &PgPool,
        cache: &dyn CacheStore,
        ttl: u64,
        id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        ReadThroughCache::fetch_one(cache, &keys::user_key(id), ttl, || async move {
            sqlx::query_as::<_, UserOut>(&format!(
                "SELECT {} FROM users WHERE id = $1",
                USER_OUT_COLUMNS
            ))
            .bind(id)
            .fetch_optional(pool)
            .await
        })
        .await
    }
}
