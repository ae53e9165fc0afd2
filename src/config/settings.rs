// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、各通知渠道、召回调度与重试等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 邮件渠道配置
    pub email: EmailSettings,
    /// Slack渠道配置
    pub slack: SlackSettings,
    /// Discord渠道配置
    pub discord: DiscordSettings,
    /// 召回邮件调度配置
    pub reengagement: ReengagementSettings,
    /// 投递重试配置
    pub retry: RetrySettings,
    /// Worker配置
    pub workers: WorkerSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 对外站点URL，用于邮件中的链接
    pub public_url: Option<String>,
}

/// 邮件渠道配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    /// 是否启用邮件投递
    pub enabled: bool,
    /// 事务邮件服务API密钥
    pub api_key: String,
    /// 发件人地址
    pub from_address: String,
    /// 调试模式：所有收件人被替换为 sink_address，防止误发外部邮件
    pub debug: bool,
    /// 调试模式下的固定收件地址
    pub sink_address: String,
}

/// Slack渠道配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SlackSettings {
    /// 是否启用Slack投递
    pub enabled: bool,
    /// Bot令牌
    pub bot_token: String,
    /// 默认投递频道
    pub default_channel: String,
}

/// Discord渠道配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordSettings {
    /// 是否启用Discord投递
    pub enabled: bool,
    /// Bot令牌
    pub bot_token: String,
    /// 公告频道ID
    pub announcement_channel_id: Option<String>,
}

/// 召回邮件调度配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ReengagementSettings {
    /// 用户最近一次登录后多少天发送召回邮件
    pub delay_days: i64,
}

/// 投递重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// 最大尝试次数（含首次尝试）
    pub max_attempts: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
}

/// Worker配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 通知Worker数量
    pub count: usize,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.public_url", None::<String>)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Channels are disabled until credentials are configured
            .set_default("email.enabled", false)?
            .set_default("email.api_key", "")?
            .set_default("email.from_address", "noreply@example.com")?
            .set_default("email.debug", true)?
            .set_default("email.sink_address", "delivered@resend.dev")?
            .set_default("slack.enabled", false)?
            .set_default("slack.bot_token", "")?
            .set_default("slack.default_channel", "#general")?
            .set_default("discord.enabled", false)?
            .set_default("discord.bot_token", "")?
            .set_default("discord.announcement_channel_id", None::<String>)?
            // Default Re-engagement settings
            .set_default("reengagement.delay_days", 7)?
            // Default Retry settings
            .set_default("retry.max_attempts", 3)?
            .set_default("retry.initial_backoff_ms", 1000)?
            .set_default("retry.max_backoff_ms", 60000)?
            // Default Worker settings
            .set_default("workers.count", 3)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("NOTIFYRS").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 计算对外站点URL
    ///
    /// 未配置时回退到本地地址；缺少协议前缀时补全 https
    pub fn site_url(&self) -> String {
        match &self.server.public_url {
            Some(url) if !url.is_empty() => {
                if url.starts_with("http") {
                    url.clone()
                } else {
                    format!("https://{}", url)
                }
            }
            _ => "https://localhost:8000".to_string(),
        }
    }
}
