//! 이메일 발송 예약
//!
//! - [`HttpEmailScheduler`] - 외부 이메일 서비스 HTTP API로 전달 (`EMAIL_SERVICE_URL`)
//! - [`LogEmailScheduler`] - 개발 환경용. 발송하지 않고 info 로그로 남깁니다.

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use crate::core::errors::{AppError, AppResult};

/// 발송할 이메일 한 통
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailScheduler: Send + Sync {
    async fn schedule(&self, message: &EmailMessage) -> AppResult<()>;
}

pub struct HttpEmailScheduler {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpEmailScheduler {
    pub fn new(endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl EmailScheduler for HttpEmailScheduler {
    async fn schedule(&self, message: &EmailMessage) -> AppResult<()> {
        let mut request = self.client.post(self.endpoint.clone()).json(message);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("이메일 서비스 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "이메일 발송 예약 실패 ({}): {}", status, error_text
            )));
        }

        log::info!("확인 이메일 발송 예약 완료: {}", message.to);
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LogEmailScheduler;

#[async_trait]
impl EmailScheduler for LogEmailScheduler {
    async fn schedule(&self, message: &EmailMessage) -> AppResult<()> {
        log::info!(
            "[email] to: {}, subject: {}\n{}",
            message.to, message.subject, message.text
        );
        Ok(())
    }
}
