use async_trait::async_trait;
use lettre::{
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// 一封待发送的邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub html: bool,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// 通过 SMTP（STARTTLS）发信
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> Result<Self, MailError> {
        let from: Mailbox = config.email_from.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.email_from.clone(),
                config.email_pwd.clone(),
            ))
            .build();

        Ok(Self { from, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let content_type = if email.html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(content_type)
            .body(email.body)?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!("Failed to send email to {}: {}", email.to, e);
            MailError::from(e)
        })?;

        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 回拨请求邮件正文
pub fn callback_body(name: &str, phone: &str) -> String {
    let name = escape_html(name);
    let phone = escape_html(phone);
    format!(
        r#"<style>
    .btn-link {{ text-decoration: underline; color: #0069c2; }}
    .title {{ margin-bottom: 10px; }}
    .block {{ margin-bottom: 3px; }}
</style>
<h3 class="title">Запрос на обратный звонок.</h3>
<div class="block">Имя: {name}</div>
<div>Телефон: <a href="tel:{phone}">{phone}</a></div>
"#
    )
}
