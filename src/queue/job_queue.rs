// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::Job;
use crate::domain::repositories::job_repository::JobRepository;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] crate::domain::repositories::job_repository::RepositoryError),
}

/// 任务队列特质
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 入队任务
    async fn enqueue(&self, job: Job) -> Result<Job, QueueError>;

    /// 出队任务
    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<Job>, QueueError>;

    /// 完成任务
    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError>;
    /// 失败任务
    async fn fail(&self, job_id: Uuid, error: Option<String>) -> Result<(), QueueError>;
}

/// 数据库支撑的任务队列实现
pub struct DatabaseJobQueue<R: JobRepository> {
    /// 任务仓库
    repository: Arc<R>,
}

impl<R: JobRepository> DatabaseJobQueue<R> {
    /// 创建新的任务队列实例
    ///
    /// # 参数
    ///
    /// * `repository` - 任务仓库
    ///
    /// # 返回值
    ///
    /// 返回新的任务队列实例
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: JobRepository> JobQueue for DatabaseJobQueue<R> {
    /// 入队任务
    ///
    /// # 参数
    ///
    /// * `job` - 要入队的任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Job)` - 入队成功的任务
    /// * `Err(QueueError)` - 入队失败
    async fn enqueue(&self, job: Job) -> Result<Job, QueueError> {
        let created = self.repository.create(&job).await?;
        Ok(created)
    }

    /// 出队任务
    ///
    /// # 参数
    ///
    /// * `worker_id` - 工作者ID
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Job))` - 成功出队的任务
    /// * `Ok(None)` - 没有可出队的任务
    /// * `Err(QueueError)` - 出队失败
    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<Job>, QueueError> {
        let job = self.repository.acquire_next(worker_id).await?;
        Ok(job)
    }

    /// 完成任务
    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.repository.mark_done(job_id).await?;
        Ok(())
    }

    /// 失败任务并记录诊断信息
    async fn fail(&self, job_id: Uuid, error: Option<String>) -> Result<(), QueueError> {
        self.repository.mark_failed(job_id, error).await?;
        Ok(())
    }
}

#[async_trait]
impl<T: JobQueue + ?Sized> JobQueue for Arc<T> {
    async fn enqueue(&self, job: Job) -> Result<Job, QueueError> {
        (**self).enqueue(job).await
    }

    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<Job>, QueueError> {
        (**self).dequeue(worker_id).await
    }

    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        (**self).complete(job_id).await
    }

    async fn fail(&self, job_id: Uuid, error: Option<String>) -> Result<(), QueueError> {
        (**self).fail(job_id, error).await
    }
}
