use std::sync::Arc;

use cache::{CacheStore, TokenCache};
use config::Config;
use services::{CdekService, Mailer, PaymentService, TokenService};
use sqlx::PgPool;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub cache: Arc<dyn CacheStore>,
    pub mailer: Arc<dyn Mailer>,
    pub cdek: CdekService,
    pub payments: PaymentService,
}

impl AppState {
    /// 组装共享状态，外部服务共用同一个 HTTP 客户端
    pub fn new(
        pool: PgPool,
        config: Config,
        cache: Arc<dyn CacheStore>,
        http: reqwest::Client,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let tokens = TokenService::new(TokenCache::new(cache.clone()), http.clone(), &config);
        let cdek = CdekService::new(tokens, http.clone(), &config);
        let payments = PaymentService::new(http, &config);

        Self {
            pool,
            config,
            cache,
            mailer,
            cdek,
            payments,
        }
    }
}
