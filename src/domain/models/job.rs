// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 任务实体
///
/// 表示一条延迟执行的通知工作单元。任务通过可选的锁键实现
/// 去重调度：同一锁键下任意时刻至多存在一条 Pending 任务，
/// 重复调度会取消旧任务并重新计时。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 任务类型，决定负载的解码方式和投递渠道
    pub job_type: JobKind,
    /// 任务状态，跟踪任务在其生命周期中的当前阶段
    pub status: JobStatus,
    /// 去重锁键，同一锁键至多一条 Pending 任务
    pub lock_key: Option<String>,
    /// 任务负载数据，由 Worker 按任务类型解码
    pub payload: serde_json::Value,
    /// 计划执行时间，为空表示立即可执行
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 终态时间（完成、失败或取消）
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
    /// 执行租约令牌，由拉取到该任务的 Worker 持有
    pub lock_token: Option<Uuid>,
    /// 执行租约过期时间，超时后任务会被重置为 Pending
    pub lock_expires_at: Option<DateTime<FixedOffset>>,
    /// 失败诊断信息
    pub error_message: Option<String>,
}

/// 任务类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// 普通邮件投递任务
    #[default]
    Email,
    /// Slack消息投递任务
    Slack,
    /// Discord公告任务
    Discord,
    /// 召回邮件任务，执行时需重新校验用户资格
    ReengagementEmail,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobKind::Email => write!(f, "email"),
            JobKind::Slack => write!(f, "slack"),
            JobKind::Discord => write!(f, "discord"),
            JobKind::ReengagementEmail => write!(f, "reengagement_email"),
        }
    }
}

impl FromStr for JobKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(JobKind::Email),
            "slack" => Ok(JobKind::Slack),
            "discord" => Ok(JobKind::Discord),
            "reengagement_email" => Ok(JobKind::ReengagementEmail),
            _ => Err(()),
        }
    }
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → Running → Done/Failed，Pending → Cancelled
/// 终态不可再变更。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 等待执行，可以被取消或被 Worker 拉取
    #[default]
    Pending,
    /// 正在被某个 Worker 执行
    Running,
    /// 已成功完成
    Done,
    /// 已被更新的调度取代而取消
    Cancelled,
    /// 执行失败，不会自动重新入队
    Failed,
}

impl JobStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Done | JobStatus::Cancelled | JobStatus::Failed
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Cancelled => write!(f, "cancelled"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "done" => Ok(JobStatus::Done),
            "cancelled" => Ok(JobStatus::Cancelled),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition")]
    InvalidStateTransition,

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Job {
    /// 创建一个新的任务
    ///
    /// # 参数
    ///
    /// * `job_type` - 任务类型
    /// * `payload` - 任务负载数据
    ///
    /// # 返回值
    ///
    /// 返回状态为 Pending 的新任务实例
    pub fn new(job_type: JobKind, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_type,
            status: JobStatus::Pending,
            lock_key: None,
            payload,
            scheduled_at: None,
            created_at: Utc::now().into(),
            started_at: None,
            completed_at: None,
            updated_at: Utc::now().into(),
            lock_token: None,
            lock_expires_at: None,
            error_message: None,
        }
    }

    /// 启动任务
    ///
    /// 将任务状态从Pending变更为Running
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Pending => {
                self.status = JobStatus::Running;
                self.started_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成任务
    ///
    /// 将任务状态从Running变更为Done
    pub fn complete(mut self) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Running => {
                self.status = JobStatus::Done;
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记任务失败
    ///
    /// 将任务状态从Running变更为Failed，任务不会被重新入队
    pub fn fail(mut self, error: impl Into<String>) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Running => {
                self.status = JobStatus::Failed;
                self.completed_at = Some(Utc::now().into());
                self.error_message = Some(error.into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 取消任务
    ///
    /// 只有尚未被 Worker 拉取的 Pending 任务可以取消
    pub fn cancel(mut self) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Pending => {
                self.status = JobStatus::Cancelled;
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }
}
