// 外部服务模块
// CDEK 运费计算、Tinkoff 支付、SMTP 邮件

pub mod cdek;
pub mod email;
pub mod payment;
pub mod token;

use thiserror::Error;

pub use cdek::CdekService;
pub use email::{Mailer, SmtpMailer};
pub use payment::PaymentService;
pub use token::TokenService;

/// 调用外部服务失败
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} responded with status {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("unexpected response from {provider}: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
}

/// 所有外部调用共用的 HTTP 客户端，每次调用都带固定超时
pub fn build_http_client(timeout: std::time::Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
