// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::UseCaseError;
use crate::domain::models::job::Job;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::triggers::{FieldTransition, ReengagementTrigger};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use uuid::Uuid;

/// 登录记录用例
///
/// 用户实体的更新路径：持久化新的登录时间，采集前后差异并
/// 显式通知触发观察器，观察器据此调度或重置召回任务。
pub struct RecordLoginUseCase<R: JobRepository + Send + Sync + 'static> {
    /// 用户仓库
    users: Arc<dyn UserRepository>,
    /// 召回触发观察器
    trigger: Arc<ReengagementTrigger<R>>,
}

impl<R: JobRepository + Send + Sync + 'static> RecordLoginUseCase<R> {
    /// 创建新的登录记录用例实例
    ///
    /// # 参数
    ///
    /// * `users` - 用户仓库
    /// * `trigger` - 召回触发观察器
    pub fn new(users: Arc<dyn UserRepository>, trigger: Arc<ReengagementTrigger<R>>) -> Self {
        Self { users, trigger }
    }

    /// 记录一次用户登录
    ///
    /// # 参数
    ///
    /// * `user_id` - 用户ID
    /// * `login_at` - 登录时间
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Job))` - 触发器调度的召回任务
    /// * `Ok(None)` - 登录时间未发生真实变化，未触发
    /// * `Err(UseCaseError)` - 用户不存在或存储失败
    pub async fn record_login(
        &self,
        user_id: Uuid,
        login_at: DateTime<FixedOffset>,
    ) -> Result<Option<Job>, UseCaseError> {
        let previous = self.users.update_last_login(user_id, login_at).await?;

        let transition = FieldTransition {
            old: previous,
            new: Some(login_at),
        };

        let job = self
            .trigger
            .on_user_saved(user_id, false, &transition)
            .await?;
        Ok(job)
    }
}
