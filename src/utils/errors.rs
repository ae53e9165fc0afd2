// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 投递错误类型
///
/// 渠道适配器向调度策略层暴露的错误分类，只有传输类错误和
/// 服务方API错误会触发重试。
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// 传输错误（网络不可达、超时、服务方5xx），可重试
    #[error("传输错误: {0}")]
    Transport(String),

    /// 服务方API拒绝（如 Slack 返回 ok=false），可重试
    #[error("服务方API错误: {0}")]
    Api(String),

    /// 认证失败（凭证无效），不重试
    #[error("认证失败: {0}")]
    Auth(String),

    /// 投递目标不存在，不重试
    #[error("目标不存在: {0}")]
    NotFound(String),

    /// 请求参数无效（调用方的问题），不重试
    #[error("无效参数: {0}")]
    Validation(String),
}

impl DeliveryError {
    /// 判断该错误是否应该由调度策略层重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeliveryError::Transport(_) | DeliveryError::Api(_))
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("仓库错误: {0}")]
    RepositoryError(String),

    #[error("投递错误: {0}")]
    DeliveryError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error("无效负载: {0}")]
    InvalidPayload(String),
}
