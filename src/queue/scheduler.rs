// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobKind};
use crate::domain::repositories::job_repository::JobRepository;
use crate::queue::job_queue::QueueError;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{debug, error, info};

/// 执行租约超时时间，超过后 Running 任务被判定为卡死
const STUCK_JOB_TIMEOUT_MINUTES: i64 = 5;

/// 任务调度器
///
/// 负责任务的延迟调度和锁键去重。实际的任务执行由 Worker
/// 通过队列主动拉取，调度器的后台循环只做维护工作。
pub struct JobScheduler<R: JobRepository + Send + Sync + 'static> {
    /// 任务仓库
    repository: Arc<R>,
}

impl<R: JobRepository + Send + Sync + 'static> JobScheduler<R> {
    /// 创建新的任务调度器实例
    ///
    /// # 参数
    ///
    /// * `repository` - 任务仓库
    ///
    /// # 返回值
    ///
    /// 返回新的任务调度器实例
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// 启动调度器后台维护任务
    ///
    /// 每分钟将执行租约过期的 Running 任务重置为 Pending，
    /// 让崩溃的 Worker 留下的任务可以被重新拉取
    ///
    /// # 返回值
    ///
    /// 返回后台任务的句柄
    pub fn start(&self) -> JoinHandle<()> {
        let repository = self.repository.clone();

        tokio::spawn(async move {
            let mut interval = interval(TokioDuration::from_secs(60));

            loop {
                interval.tick().await;

                match repository
                    .reset_stuck_jobs(Duration::minutes(STUCK_JOB_TIMEOUT_MINUTES))
                    .await
                {
                    Ok(count) => {
                        if count > 0 {
                            info!("Reset {} stuck jobs", count);
                        }
                    }
                    Err(e) => {
                        error!("Failed to reset stuck jobs: {}", e);
                    }
                }
            }
        })
    }

    /// 在特定时间调度任务执行
    ///
    /// # 参数
    ///
    /// * `job_type` - 任务类型
    /// * `payload` - 任务负载
    /// * `time` - 执行时间
    ///
    /// # 返回值
    ///
    /// * `Ok(Job)` - 调度成功的任务
    /// * `Err(QueueError)` - 调度失败
    pub async fn schedule_at(
        &self,
        job_type: JobKind,
        payload: serde_json::Value,
        time: DateTime<Utc>,
    ) -> Result<Job, QueueError> {
        let mut job = Job::new(job_type, payload);
        job.scheduled_at = Some(time.into());

        let created = self.repository.create(&job).await?;
        Ok(created)
    }

    /// 在一段时间后调度任务执行
    ///
    /// # 参数
    ///
    /// * `job_type` - 任务类型
    /// * `payload` - 任务负载
    /// * `delay` - 延迟时间
    pub async fn schedule_in(
        &self,
        job_type: JobKind,
        payload: serde_json::Value,
        delay: Duration,
    ) -> Result<Job, QueueError> {
        self.schedule_at(job_type, payload, Utc::now() + delay).await
    }

    /// 以锁键去重的方式调度任务
    ///
    /// 同一锁键任意时刻至多一条 Pending 任务：先取消该锁键下
    /// 现存的 Pending 任务，再以完整延迟重新创建，也就是说
    /// 重复调度会重置计时。取消遇到的竞争失败（任务刚被 Worker
    /// 拉走）静默忽略，已经开始执行的任务不会被打断。
    ///
    /// # 参数
    ///
    /// * `lock_key` - 去重锁键
    /// * `job_type` - 任务类型
    /// * `payload` - 任务负载
    /// * `delay` - 延迟时间
    ///
    /// # 返回值
    ///
    /// * `Ok(Job)` - 新创建的 Pending 任务
    /// * `Err(QueueError)` - 调度失败
    pub async fn schedule_deduped(
        &self,
        lock_key: &str,
        job_type: JobKind,
        payload: serde_json::Value,
        delay: Duration,
    ) -> Result<Job, QueueError> {
        let existing = self.repository.find_pending_by_lock_key(lock_key).await?;

        for stale in existing {
            if self.repository.cancel_pending(stale.id).await? {
                debug!("Cancelled stale job {} for lock key {}", stale.id, lock_key);
            } else {
                // 任务已被 Worker 拉走，竞争失败，留给 Worker 执行
                debug!(
                    "Job {} for lock key {} already claimed, leaving it alone",
                    stale.id, lock_key
                );
            }
        }

        let mut job = Job::new(job_type, payload);
        job.lock_key = Some(lock_key.to_string());
        job.scheduled_at = Some((Utc::now() + delay).into());

        let created = self.repository.create(&job).await?;
        Ok(created)
    }
}
