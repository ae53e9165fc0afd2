// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobKind};
use crate::domain::repositories::job_repository::JobRepository;
use crate::queue::job_queue::QueueError;
use crate::queue::scheduler::JobScheduler;
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 字段变更差异
///
/// 由持久化调用方在保存前后采集，触发观察器只依赖这个
/// 显式差异，不感知存储层。
#[derive(Debug, Clone)]
pub struct FieldTransition<T: PartialEq> {
    /// 保存前的旧值
    pub old: T,
    /// 保存后的新值
    pub new: T,
}

impl<T: PartialEq> FieldTransition<T> {
    /// 字段值是否发生了真实变化
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// 召回邮件任务的去重锁键
pub fn reengagement_lock_key(user_id: Uuid) -> String {
    format!("we_miss_you_{}", user_id)
}

/// 用户召回触发观察器
///
/// 观察用户最近登录时间的变更：每次真实变化都会取消该用户
/// 现存的召回任务并以完整延迟重新调度，使计时随活跃滑动。
/// 新建用户不触发，字段未变化的保存不触发。
pub struct ReengagementTrigger<R: JobRepository + Send + Sync + 'static> {
    /// 任务调度器
    scheduler: Arc<JobScheduler<R>>,
    /// 召回延迟
    delay: Duration,
}

impl<R: JobRepository + Send + Sync + 'static> ReengagementTrigger<R> {
    /// 创建新的触发观察器实例
    ///
    /// # 参数
    ///
    /// * `scheduler` - 任务调度器
    /// * `delay_days` - 最近登录后多少天发送召回邮件
    pub fn new(scheduler: Arc<JobScheduler<R>>, delay_days: i64) -> Self {
        Self {
            scheduler,
            delay: Duration::days(delay_days),
        }
    }

    /// 用户保存后的触发入口
    ///
    /// # 参数
    ///
    /// * `user_id` - 用户ID
    /// * `is_new_record` - 本次保存是否为新建记录
    /// * `login_at` - 最近登录时间的保存前后差异
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Job))` - 已调度的召回任务
    /// * `Ok(None)` - 本次保存不满足触发条件
    /// * `Err(QueueError)` - 调度失败
    pub async fn on_user_saved(
        &self,
        user_id: Uuid,
        is_new_record: bool,
        login_at: &FieldTransition<Option<chrono::DateTime<chrono::FixedOffset>>>,
    ) -> Result<Option<Job>, QueueError> {
        if is_new_record {
            debug!("User {} was just created, not scheduling re-engagement", user_id);
            return Ok(None);
        }

        if !login_at.changed() {
            return Ok(None);
        }

        let job = self
            .scheduler
            .schedule_deduped(
                &reengagement_lock_key(user_id),
                JobKind::ReengagementEmail,
                json!({ "user_id": user_id }),
                self.delay,
            )
            .await?;

        debug!(
            "Scheduled re-engagement job {} for user {}",
            job.id, user_id
        );
        Ok(Some(job))
    }
}
