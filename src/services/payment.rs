use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Config;

use super::ProviderError;

const PROVIDER: &str = "tinkoff";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckoutItem {
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub amount: i64,
    pub tax: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckoutData {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckoutReceipt {
    pub email: String,
    pub phone: String,
    pub taxation: String,
    pub items: Vec<CheckoutItem>,
}

/// 下单请求，大写字段原样转发给支付网关
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutIn {
    #[serde(rename = "Amount")]
    pub amount: i32,
    #[serde(rename = "DATA")]
    pub data: CheckoutData,
    #[serde(rename = "Receipt")]
    pub receipt: CheckoutReceipt,
    pub city: String,
    pub zip: String,
    pub address: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub promo_code_id: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitRequest<'a> {
    terminal_key: &'a str,
    amount: i32,
    order_id: i32,
    description: &'a str,
    token: &'a str,
    #[serde(rename = "DATA")]
    data: &'a CheckoutData,
    receipt: &'a CheckoutReceipt,
}

/// Tinkoff 支付初始化
#[derive(Clone)]
pub struct PaymentService {
    http: reqwest::Client,
    init_url: String,
    terminal_key: String,
    terminal_pwd: String,
    terminal_desc: String,
}

impl PaymentService {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            init_url: format!("{}/v2/Init", config.tinkoff_url.trim_end_matches('/')),
            terminal_key: config.terminal_key.clone(),
            terminal_pwd: config.terminal_pwd.clone(),
            terminal_desc: config.terminal_desc.clone(),
        }
    }

    /// 签名：Amount、描述、订单号、终端密码、终端号依次拼接后取 SHA-256 小写十六进制
    pub fn generate_token(&self, amount: i32, order_id: i32) -> String {
        let payload = format!(
            "{}{}{}{}{}",
            amount, self.terminal_desc, order_id, self.terminal_pwd, self.terminal_key
        );
        format!("{:x}", Sha256::digest(payload.as_bytes()))
    }

    /// 调用 `Init`，返回网关的原始 JSON
    pub async fn init_payment(
        &self,
        checkout: &CheckoutIn,
        order_id: i32,
        token: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        let body = InitRequest {
            terminal_key: &self.terminal_key,
            amount: checkout.amount,
            order_id,
            description: &self.terminal_desc,
            token,
            data: &checkout.data,
            receipt: &checkout.receipt,
        };

        let response = self
            .http
            .post(&self.init_url)
            .json(&body)
            .send()
            .await
            .map_err(|source| {
                tracing::error!("Payment init for order {} failed: {}", order_id, source);
                ProviderError::Request {
                    provider: PROVIDER,
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Payment init for order {} returned {}", order_id, status);
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })
    }
}

/// 取出网关返回的 `PaymentId`，网关可能给字符串也可能给数字
pub fn payment_id(result: &serde_json::Value) -> Result<String, ProviderError> {
    match result.get("PaymentId") {
        Some(serde_json::Value::String(id)) => Ok(id.clone()),
        Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
        _ => Err(ProviderError::Decode {
            provider: PROVIDER,
            message: "reply carries no PaymentId".into(),
        }),
    }
}
