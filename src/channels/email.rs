// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::channels::traits::EmailSender;
use crate::config::settings::EmailSettings;
use crate::domain::models::notification::EmailMessage;
use crate::utils::errors::DeliveryError;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Resend 风格的事务邮件适配器
///
/// 通过 HTTP API 投递邮件，按响应状态码分类错误：
/// 凭证问题不可重试，网络与服务方5xx交给上层重试。
pub struct ResendEmailChannel {
    /// HTTP 客户端
    client: reqwest::Client,
    /// API 基础地址
    base_url: String,
    /// API 密钥
    api_key: String,
    /// 发件人地址
    from_address: String,
}

impl ResendEmailChannel {
    /// 创建新的邮件渠道适配器
    ///
    /// # 参数
    ///
    /// * `settings` - 邮件渠道配置
    pub fn new(settings: &EmailSettings) -> Self {
        Self::with_base_url(settings, "https://api.resend.com".to_string())
    }

    /// 指定API地址创建适配器，供测试指向模拟服务
    pub fn with_base_url(settings: &EmailSettings, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
            from_address: settings.from_address.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailChannel {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        if message.recipients.is_empty() {
            return Err(DeliveryError::Validation("empty recipient list".into()));
        }

        let body = json!({
            "from": self.from_address,
            "to": message.recipients,
            "subject": message.subject,
            "html": message.html,
        });

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(DeliveryError::Auth(format!("{}: {}", status, text))),
            400..=499 => Err(DeliveryError::Validation(format!("{}: {}", status, text))),
            _ => Err(DeliveryError::Transport(format!("{}: {}", status, text))),
        }
    }
}
