// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::channels::traits::DiscordSender;
use crate::config::settings::DiscordSettings;
use crate::domain::models::notification::Embed;
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::json;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::{debug, warn};

/// Bot令牌的最小合法长度，低于此值视为配置错误
const MIN_TOKEN_LEN: usize = 50;

/// 已解析频道缓存容量
const CHANNEL_CACHE_SIZE: usize = 64;

/// Discord公告渠道适配器
///
/// 永不向调用方抛错：每一种失败条件都有独立的日志诊断，
/// 调用方只拿到布尔结果。频道解析结果缓存，避免每次公告
/// 都重新查询频道。
pub struct DiscordChannel {
    /// HTTP 客户端
    client: reqwest::Client,
    /// API 基础地址
    base_url: String,
    /// Bot令牌
    bot_token: String,
    /// 公告频道ID
    channel_id: Option<String>,
    /// 已验证存在且可访问的频道
    resolved_channels: Mutex<LruCache<String, ()>>,
}

impl DiscordChannel {
    /// 创建新的Discord渠道适配器
    pub fn new(settings: &DiscordSettings) -> Self {
        Self::with_base_url(settings, "https://discord.com/api/v10".to_string())
    }

    /// 指定API地址创建适配器，供测试指向模拟服务
    pub fn with_base_url(settings: &DiscordSettings, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url,
            bot_token: settings.bot_token.clone(),
            channel_id: settings.announcement_channel_id.clone(),
            resolved_channels: Mutex::new(LruCache::new(
                NonZeroUsize::new(CHANNEL_CACHE_SIZE).unwrap(),
            )),
        }
    }

    /// 校验令牌有效性
    async fn verify_login(&self) -> bool {
        let response = match self
            .client
            .get(format!("{}/users/@me", self.base_url))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Discord login check failed: {}", e);
                return false;
            }
        };

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Discord bot token was rejected, check credentials");
            return false;
        }
        if !response.status().is_success() {
            warn!(
                "Discord login check returned unexpected status {}",
                response.status()
            );
            return false;
        }

        true
    }

    /// 解析公告频道，缓存命中时跳过查询
    async fn resolve_channel(&self, channel_id: &str) -> bool {
        if self.resolved_channels.lock().contains(channel_id) {
            debug!("Discord channel {} resolved from cache", channel_id);
            return true;
        }

        let response = match self
            .client
            .get(format!("{}/channels/{}", self.base_url, channel_id))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Discord channel lookup failed: {}", e);
                return false;
            }
        };

        match response.status() {
            reqwest::StatusCode::NOT_FOUND => {
                warn!("Discord channel {} does not exist", channel_id);
                false
            }
            reqwest::StatusCode::FORBIDDEN => {
                warn!("Discord bot has no access to channel {}", channel_id);
                false
            }
            status if status.is_success() => {
                self.resolved_channels
                    .lock()
                    .put(channel_id.to_string(), ());
                true
            }
            status => {
                warn!(
                    "Discord channel lookup returned unexpected status {}",
                    status
                );
                false
            }
        }
    }
}

#[async_trait]
impl DiscordSender for DiscordChannel {
    async fn announce(&self, content: Option<&str>, embed: Option<&Embed>) -> bool {
        let Some(channel_id) = self.channel_id.as_deref() else {
            warn!("Discord announcement skipped: no announcement channel configured");
            return false;
        };

        if self.bot_token.len() < MIN_TOKEN_LEN {
            warn!("Discord announcement skipped: bot token looks malformed");
            return false;
        }

        if !self.verify_login().await {
            return false;
        }

        if !self.resolve_channel(channel_id).await {
            return false;
        }

        let mut body = json!({});
        if let Some(content) = content {
            body["content"] = json!(content);
        }
        if let Some(embed) = embed {
            body["embeds"] = json!([embed.to_payload()]);
        }

        let response = match self
            .client
            .post(format!("{}/channels/{}/messages", self.base_url, channel_id))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Discord message delivery failed: {}", e);
                return false;
            }
        };

        if response.status().is_success() {
            true
        } else {
            warn!(
                "Discord message delivery returned status {}",
                response.status()
            );
            false
        }
    }
}
