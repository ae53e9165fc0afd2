// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::User;
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;
    /// 根据ID查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    /// 更新最近登录时间
    ///
    /// 返回更新前的 `last_login_at` 旧值，供调用方构造字段变更
    /// 差异传给触发观察器。用户不存在时返回 `NotFound`。
    async fn update_last_login(
        &self,
        id: Uuid,
        login_at: DateTime<FixedOffset>,
    ) -> Result<Option<DateTime<FixedOffset>>, RepositoryError>;
    /// 软删除用户
    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError>;
}
