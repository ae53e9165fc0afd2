// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::channels::traits::SlackSender;
use crate::config::settings::SlackSettings;
use crate::domain::models::notification::SlackMessage;
use crate::utils::errors::DeliveryError;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Slack渠道适配器
///
/// 所有消息都以 `@channel ` 前缀投递，Slack 在 HTTP 200 里
/// 用 `ok=false` 表达业务失败，归为可重试的API错误。
pub struct SlackChannel {
    /// HTTP 客户端
    client: reqwest::Client,
    /// API 基础地址
    base_url: String,
    /// Bot令牌
    bot_token: String,
}

impl SlackChannel {
    /// 创建新的Slack渠道适配器
    pub fn new(settings: &SlackSettings) -> Self {
        Self::with_base_url(settings, "https://slack.com/api".to_string())
    }

    /// 指定API地址创建适配器，供测试指向模拟服务
    pub fn with_base_url(settings: &SlackSettings, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url,
            bot_token: settings.bot_token.clone(),
        }
    }
}

#[async_trait]
impl SlackSender for SlackChannel {
    async fn post(&self, channel: &str, message: &SlackMessage) -> Result<(), DeliveryError> {
        let body = json!({
            "channel": channel,
            "text": format!("@channel {}", message.text),
        });

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Transport(format!("{}: {}", status, text)));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DeliveryError::Api(format!("invalid response body: {}", e)))?;

        if payload["ok"].as_bool() == Some(true) {
            Ok(())
        } else {
            let error = payload["error"].as_str().unwrap_or("unknown_error");
            Err(DeliveryError::Api(error.to_string()))
        }
    }
}
