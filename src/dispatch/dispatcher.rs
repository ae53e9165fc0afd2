// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::channels::traits::{DiscordSender, EmailSender, SlackSender};
use crate::config::settings::{DiscordSettings, EmailSettings, RetrySettings, SlackSettings};
use crate::domain::models::notification::{EmailMessage, Embed, SlackMessage};
use crate::utils::errors::DeliveryError;
use crate::utils::retry_policy::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// 调度策略层
///
/// 渠道适配器之上的统一出口：开关检查、调试收件地址改写和
/// 有界重试都在这里完成，适配器本身只做单次投递。返回
/// `Ok(false)` 表示渠道被开关关闭，投递被跳过而非失败。
pub struct Dispatcher {
    /// 邮件渠道
    email: Arc<dyn EmailSender>,
    /// Slack渠道
    slack: Arc<dyn SlackSender>,
    /// Discord渠道
    discord: Arc<dyn DiscordSender>,
    /// 邮件渠道配置
    email_settings: EmailSettings,
    /// Slack渠道配置
    slack_settings: SlackSettings,
    /// Discord渠道配置
    discord_settings: DiscordSettings,
    /// 重试策略
    retry: RetryPolicy,
}

impl Dispatcher {
    /// 创建新的调度策略层实例
    ///
    /// # 参数
    ///
    /// * `email` - 邮件渠道适配器
    /// * `slack` - Slack渠道适配器
    /// * `discord` - Discord渠道适配器
    /// * `email_settings` - 邮件渠道配置
    /// * `slack_settings` - Slack渠道配置
    /// * `discord_settings` - Discord渠道配置
    /// * `retry_settings` - 重试配置
    pub fn new(
        email: Arc<dyn EmailSender>,
        slack: Arc<dyn SlackSender>,
        discord: Arc<dyn DiscordSender>,
        email_settings: EmailSettings,
        slack_settings: SlackSettings,
        discord_settings: DiscordSettings,
        retry_settings: &RetrySettings,
    ) -> Self {
        let retry = RetryPolicy {
            max_attempts: retry_settings.max_attempts,
            initial_backoff: Duration::from_millis(retry_settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(retry_settings.max_backoff_ms),
            ..RetryPolicy::standard()
        };

        Self {
            email,
            slack,
            discord,
            email_settings,
            slack_settings,
            discord_settings,
            retry,
        }
    }

    /// 发送邮件
    ///
    /// 渠道关闭时跳过并返回 `Ok(false)`；调试模式下所有收件人
    /// 被替换为固定的调试收件地址。可重试错误按策略重试，
    /// 次数耗尽后传播最后一次错误。
    pub async fn send_email(&self, message: &EmailMessage) -> Result<bool, DeliveryError> {
        if !self.email_settings.enabled {
            debug!("Email delivery disabled, skipping '{}'", message.subject);
            return Ok(false);
        }

        let mut outgoing = message.clone();
        if self.email_settings.debug {
            outgoing.recipients = vec![self.email_settings.sink_address.clone()];
        }

        self.retry
            .run("send_email", || self.email.send(&outgoing))
            .await
            .inspect(|_| {
                metrics::counter!("notifications_sent_total", "channel" => "email").increment(1);
            })
            .inspect_err(|_| {
                metrics::counter!("notifications_failed_total", "channel" => "email").increment(1);
            })?;

        info!("Email '{}' delivered", message.subject);
        Ok(true)
    }

    /// 向默认Slack频道投递消息
    pub async fn notify_slack(&self, message: &SlackMessage) -> Result<bool, DeliveryError> {
        if !self.slack_settings.enabled {
            debug!("Slack delivery disabled, skipping message");
            return Ok(false);
        }

        let channel = self.slack_settings.default_channel.clone();

        self.retry
            .run("notify_slack", || self.slack.post(&channel, message))
            .await
            .inspect(|_| {
                metrics::counter!("notifications_sent_total", "channel" => "slack").increment(1);
            })
            .inspect_err(|_| {
                metrics::counter!("notifications_failed_total", "channel" => "slack").increment(1);
            })?;

        info!("Slack message delivered to {}", channel);
        Ok(true)
    }

    /// 向Discord公告频道投递消息
    ///
    /// 尽力而为：不重试，不抛错，只返回是否成功。
    pub async fn announce_discord(&self, content: Option<&str>, embed: Option<&Embed>) -> bool {
        if !self.discord_settings.enabled {
            debug!("Discord delivery disabled, skipping announcement");
            return false;
        }

        let delivered = self.discord.announce(content, embed).await;
        if delivered {
            metrics::counter!("notifications_sent_total", "channel" => "discord").increment(1);
        } else {
            metrics::counter!("notifications_failed_total", "channel" => "discord").increment(1);
        }

        delivered
    }
}
