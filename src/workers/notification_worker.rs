// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::emails::render_we_miss_you;
use crate::dispatch::Dispatcher;
use crate::domain::models::job::{Job, JobKind};
use crate::domain::models::notification::{
    DiscordAnnouncement, EmailMessage, ReengagementPayload, SlackMessage,
};
use crate::domain::repositories::user_repository::UserRepository;
use crate::queue::job_queue::JobQueue;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 队列为空时的轮询间隔
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 通知工作器
///
/// 以自身ID为租约令牌从队列拉取任务，按任务类型解码负载并
/// 通过调度策略层投递。投递失败的任务标记为 Failed 并记录
/// 诊断信息，不会自动重新入队。
pub struct NotificationWorker<Q: JobQueue> {
    /// 工作器标识，同时作为执行租约令牌
    id: Uuid,
    /// 工作器名称
    name: String,
    /// 任务队列
    queue: Arc<Q>,
    /// 调度策略层
    dispatcher: Arc<Dispatcher>,
    /// 用户仓库，召回任务执行时重新校验资格
    users: Arc<dyn UserRepository>,
    /// 站点URL，用于召回邮件中的链接
    site_url: String,
}

impl<Q: JobQueue> NotificationWorker<Q> {
    /// 创建新的通知工作器实例
    ///
    /// # 参数
    ///
    /// * `queue` - 任务队列
    /// * `dispatcher` - 调度策略层
    /// * `users` - 用户仓库
    /// * `site_url` - 站点URL
    pub fn new(
        queue: Arc<Q>,
        dispatcher: Arc<Dispatcher>,
        users: Arc<dyn UserRepository>,
        site_url: String,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            name: format!("notification-worker-{}", id),
            queue,
            dispatcher,
            users,
            site_url,
        }
    }

    /// 处理一条任务并写回终态
    async fn process(&self, job: Job) {
        let kind = job.job_type.to_string();
        let start = std::time::Instant::now();

        let outcome = self.execute(&job).await;

        histogram!("job_processing_duration_seconds", "kind" => kind.clone())
            .record(start.elapsed().as_secs_f64());

        match outcome {
            Ok(()) => {
                counter!("jobs_processed_total", "kind" => kind, "outcome" => "done").increment(1);
                if let Err(e) = self.queue.complete(job.id).await {
                    error!("Failed to mark job {} done: {}", job.id, e);
                }
            }
            Err(err) => {
                counter!("jobs_processed_total", "kind" => kind, "outcome" => "failed")
                    .increment(1);
                error!("Job {} failed: {}", job.id, err);
                if let Err(e) = self.queue.fail(job.id, Some(err.to_string())).await {
                    error!("Failed to mark job {} failed: {}", job.id, e);
                }
            }
        }
    }

    /// 按任务类型执行投递
    async fn execute(&self, job: &Job) -> Result<(), WorkerError> {
        match job.job_type {
            JobKind::Email => {
                let message: EmailMessage = serde_json::from_value(job.payload.clone())
                    .map_err(|e| WorkerError::InvalidPayload(e.to_string()))?;

                self.dispatcher
                    .send_email(&message)
                    .await
                    .map_err(|e| WorkerError::DeliveryError(e.to_string()))?;
                Ok(())
            }
            JobKind::Slack => {
                let message: SlackMessage = serde_json::from_value(job.payload.clone())
                    .map_err(|e| WorkerError::InvalidPayload(e.to_string()))?;

                self.dispatcher
                    .notify_slack(&message)
                    .await
                    .map_err(|e| WorkerError::DeliveryError(e.to_string()))?;
                Ok(())
            }
            JobKind::Discord => {
                let announcement: DiscordAnnouncement =
                    serde_json::from_value(job.payload.clone())
                        .map_err(|e| WorkerError::InvalidPayload(e.to_string()))?;

                // 公告渠道的布尔结果是单次尝试的终局，失败不重新入队
                let delivered = self
                    .dispatcher
                    .announce_discord(
                        announcement.content.as_deref(),
                        announcement.embed.as_ref(),
                    )
                    .await;
                if !delivered {
                    warn!("Discord announcement for job {} was not delivered", job.id);
                }
                Ok(())
            }
            JobKind::ReengagementEmail => {
                let payload: ReengagementPayload = serde_json::from_value(job.payload.clone())
                    .map_err(|e| WorkerError::InvalidPayload(e.to_string()))?;

                let user = self
                    .users
                    .find_by_id(payload.user_id)
                    .await
                    .map_err(|e| WorkerError::RepositoryError(e.to_string()))?;

                // 调度和执行之间用户可能被删除或停用，静默跳过
                let Some(user) = user.filter(|u| u.is_active) else {
                    info!(
                        "User {} is gone or inactive, skipping re-engagement email",
                        payload.user_id
                    );
                    return Ok(());
                };

                let email = render_we_miss_you(&user, &self.site_url);
                self.dispatcher
                    .send_email(&email)
                    .await
                    .map_err(|e| WorkerError::DeliveryError(e.to_string()))?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<Q: JobQueue> Worker for NotificationWorker<Q> {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Notification worker {} started", self.id);

        loop {
            match self.queue.dequeue(self.id).await {
                Ok(Some(job)) => {
                    self.process(job).await;
                }
                Ok(None) => {
                    sleep(IDLE_POLL_INTERVAL).await;
                }
                Err(e) => {
                    error!("Worker {} failed to dequeue: {}", self.id, e);
                    sleep(IDLE_POLL_INTERVAL).await;
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
