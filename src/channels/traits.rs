// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notification::{EmailMessage, Embed, SlackMessage};
use crate::utils::errors::DeliveryError;
use async_trait::async_trait;
use std::sync::Arc;

/// 邮件发送器特质
///
/// 适配器只负责一次投递尝试和错误分类，重试由上层的
/// 调度策略层负责。
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// 发送一封邮件
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}

/// Slack发送器特质
#[async_trait]
pub trait SlackSender: Send + Sync {
    /// 向指定频道投递消息
    async fn post(&self, channel: &str, message: &SlackMessage) -> Result<(), DeliveryError>;
}

/// Discord发送器特质
///
/// 公告属于尽力而为的投递：任何失败都不向调用方抛出错误，
/// 只返回是否成功，诊断信息通过日志输出。
#[async_trait]
pub trait DiscordSender: Send + Sync {
    /// 向公告频道投递消息，返回是否成功
    async fn announce(&self, content: Option<&str>, embed: Option<&Embed>) -> bool;
}

#[async_trait]
impl<T: EmailSender + ?Sized> EmailSender for Arc<T> {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        self.as_ref().send(message).await
    }
}

#[async_trait]
impl<T: SlackSender + ?Sized> SlackSender for Arc<T> {
    async fn post(&self, channel: &str, message: &SlackMessage) -> Result<(), DeliveryError> {
        self.as_ref().post(channel, message).await
    }
}

#[async_trait]
impl<T: DiscordSender + ?Sized> DiscordSender for Arc<T> {
    async fn announce(&self, content: Option<&str>, embed: Option<&Embed>) -> bool {
        self.as_ref().announce(content, embed).await
    }
}
