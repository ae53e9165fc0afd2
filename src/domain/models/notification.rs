// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// 邮件消息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    /// 邮件主题
    pub subject: String,
    /// HTML正文
    pub html: String,
    /// 收件人地址列表
    pub recipients: Vec<String>,
}

/// Slack消息负载
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlackMessage {
    /// 消息正文，适配器发送时会加上 @channel 前缀
    pub text: String,
}

/// 召回邮件任务负载
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReengagementPayload {
    /// 目标用户ID
    pub user_id: uuid::Uuid,
}

/// Discord公告任务负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordAnnouncement {
    /// 纯文本内容
    pub content: Option<String>,
    /// 结构化嵌入内容
    pub embed: Option<Embed>,
}

/// 富消息嵌入内容
///
/// Discord风格的结构化消息：标题、描述、侧边色条、可点击的
/// 标题链接、有序命名字段、脚注和缩略图均为可选。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    /// 标题
    pub title: Option<String>,
    /// 描述
    pub description: Option<String>,
    /// 侧边色条颜色（十进制RGB值）
    pub color: Option<u32>,
    /// 标题链接
    pub url: Option<String>,
    /// 有序命名字段列表
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    /// 脚注文本
    pub footer_text: Option<String>,
    /// 缩略图URL
    pub thumbnail_url: Option<String>,
}

/// 嵌入内容字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    /// 字段名称
    pub name: String,
    /// 字段值
    pub value: String,
    /// 是否与相邻字段同行显示
    pub inline: bool,
}

impl Embed {
    /// 序列化为 Discord API 的 embed 对象
    pub fn to_payload(&self) -> Value {
        let mut embed = json!({});

        if let Some(title) = &self.title {
            embed["title"] = json!(title);
        }
        if let Some(description) = &self.description {
            embed["description"] = json!(description);
        }
        if let Some(color) = self.color {
            embed["color"] = json!(color);
        }
        if let Some(url) = &self.url {
            embed["url"] = json!(url);
        }
        if !self.fields.is_empty() {
            embed["fields"] = Value::Array(
                self.fields
                    .iter()
                    .map(|f| json!({"name": f.name, "value": f.value, "inline": f.inline}))
                    .collect(),
            );
        }
        if let Some(footer_text) = &self.footer_text {
            embed["footer"] = json!({"text": footer_text});
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            embed["thumbnail"] = json!({"url": thumbnail_url});
        }

        embed
    }
}
