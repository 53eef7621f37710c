use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::{Config, Tariff};

use super::{ProviderError, TokenService};

/// 包裹尺寸与重量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub weight: i64,
    pub height: i64,
    pub length: i64,
    pub width: i64,
}

/// 运费计算请求
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryIn {
    pub city_name: String,
    pub city_code: i64,
    pub address: String,
    pub city_zip: String,
    pub packages: Vec<Package>,
}

/// 单个资费的计算结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TariffQuote {
    pub name: String,
    pub code: u32,
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct Location {
    code: i64,
}

#[derive(Debug, Serialize)]
struct TariffRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    from_location: Location,
    to_location: Location,
    packages: &'a [Package],
    tariff_code: String,
}

/// CDEK 运费计算服务
#[derive(Clone)]
pub struct CdekService {
    token_service: TokenService,
    http: reqwest::Client,
    tariff_url: String,
    from_city: i64,
    tariffs: Vec<Tariff>,
}

impl CdekService {
    pub fn new(token_service: TokenService, http: reqwest::Client, config: &Config) -> Self {
        Self {
            token_service,
            http,
            tariff_url: format!(
                "{}/v2/calculator/tariff",
                config.cdek_endpoint.trim_end_matches('/')
            ),
            from_city: config.cdek_from_city,
            tariffs: config.cdek_tariffs.clone(),
        }
    }

    /// 按配置的每个资费并发计算运费
    ///
    /// 获取令牌失败时整体失败；单个资费失败只会被丢弃，返回其余成功的结果。
    pub async fn calculate(&self, delivery: &DeliveryIn) -> Result<Vec<TariffQuote>, ProviderError> {
        let token = self.token_service.get_valid_token().await?;

        let requests = self
            .tariffs
            .iter()
            .map(|tariff| self.calculate_tariff(tariff, delivery, &token));

        Ok(join_all(requests).await.into_iter().flatten().collect())
    }

    async fn calculate_tariff(
        &self,
        tariff: &Tariff,
        delivery: &DeliveryIn,
        token: &str,
    ) -> Option<TariffQuote> {
        let body = TariffRequest {
            kind: "1",
            from_location: Location {
                code: self.from_city,
            },
            to_location: Location {
                code: delivery.city_code,
            },
            packages: &delivery.packages,
            tariff_code: tariff.code.to_string(),
        };

        let response = match self
            .http
            .post(&self.tariff_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Tariff {} request failed: {}", tariff.code, e);
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::error!(
                "Tariff {} calculation returned status {}",
                tariff.code,
                response.status()
            );
            return None;
        }

        match response.json::<serde_json::Value>().await {
            Ok(data) => Some(TariffQuote {
                name: tariff.name.clone(),
                code: tariff.code,
                data,
            }),
            Err(e) => {
                tracing::error!("Tariff {} returned an unreadable body: {}", tariff.code, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cache::{MemoryCacheStore, TokenCache};
    use crate::test_support::test_config;

    fn delivery() -> DeliveryIn {
        DeliveryIn {
            city_name: "X".into(),
            city_code: 44,
            address: "Y".into(),
            city_zip: "Z".into(),
            packages: vec![Package {
                weight: 4000,
                height: 10,
                length: 10,
                width: 10,
            }],
        }
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v2/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    fn service(server: &MockServer) -> CdekService {
        let config = test_config(&server.uri(), &server.uri());
        let http = reqwest::Client::new();
        let tokens = TokenService::new(
            TokenCache::new(Arc::new(MemoryCacheStore::new())),
            http.clone(),
            &config,
        );
        CdekService::new(tokens, http, &config)
    }

    #[tokio::test]
    async fn failed_tariff_is_dropped() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/calculator/tariff"))
            .and(header("authorization", "Bearer tok"))
            .and(body_partial_json(serde_json::json!({
                "type": "1",
                "tariff_code": "136",
                "from_location": {"code": 137},
                "to_location": {"code": 44}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"delivery_sum": 350.0, "period_min": 2})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/calculator/tariff"))
            .and(body_partial_json(serde_json::json!({"tariff_code": "137"})))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let quotes = service(&server).calculate(&delivery()).await.unwrap();

        assert_eq!(
            quotes,
            vec![TariffQuote {
                name: "Посылка склад-склад".into(),
                code: 136,
                data: serde_json::json!({"delivery_sum": 350.0, "period_min": 2}),
            }]
        );
    }

    #[tokio::test]
    async fn all_tariffs_failing_yields_empty_list() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/calculator/tariff"))
            .respond_with(ResponseTemplate::new(400))
            .expect(2)
            .mount(&server)
            .await;

        let quotes = service(&server).calculate(&delivery()).await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn token_failure_fails_the_calculation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/oauth/token"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/calculator/tariff"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = service(&server).calculate(&delivery()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { .. }));
    }
}
