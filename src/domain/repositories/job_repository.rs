// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::Job;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 任务仓库特质
///
/// 定义任务存储的数据访问接口：创建、按锁键查询待执行任务、
/// 条件取消、带租约的拉取执行，以及终态标记。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, job: &Job) -> Result<Job, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, RepositoryError>;
    /// 更新任务
    async fn update(&self, job: &Job) -> Result<Job, RepositoryError>;
    /// 查找指定锁键下所有 Pending 任务
    async fn find_pending_by_lock_key(&self, lock_key: &str) -> Result<Vec<Job>, RepositoryError>;
    /// 条件取消一条 Pending 任务
    ///
    /// 返回 `Ok(false)` 表示任务已不处于 Pending 状态（通常是已被
    /// Worker 拉取），即竞争失败，调用方应静默忽略。
    async fn cancel_pending(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// 拉取下一个到期的 Pending 任务并加执行租约
    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<Job>, RepositoryError>;
    /// 标记任务已完成
    async fn mark_done(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 标记任务已失败并记录诊断信息
    async fn mark_failed(&self, id: Uuid, error: Option<String>) -> Result<(), RepositoryError>;
    /// 重置租约过期的 Running 任务为 Pending
    async fn reset_stuck_jobs(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError>;
}
