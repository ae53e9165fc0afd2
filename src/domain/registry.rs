// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::report::EntityKind;
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// 可举报实体特质
///
/// 每个实体模块为自身提供存在性校验和下架操作，举报流程
/// 通过注册表按实体类型分发，不做反射式类型解析。
#[async_trait]
pub trait Reportable: Send + Sync {
    /// 实体是否存在
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// 下架（软删除）实体
    async fn deactivate(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// 实体类型注册表
///
/// 封闭注册表：每种 `EntityKind` 对应一个 `Reportable` 实现。
pub struct EntityRegistry {
    users: Arc<dyn Reportable>,
    comments: Arc<dyn Reportable>,
}

impl EntityRegistry {
    /// 创建注册表
    ///
    /// # 参数
    ///
    /// * `users` - 用户实体的 Reportable 实现
    /// * `comments` - 评论实体的 Reportable 实现
    pub fn new(users: Arc<dyn Reportable>, comments: Arc<dyn Reportable>) -> Self {
        Self { users, comments }
    }

    /// 按实体类型解析对应的实体模块
    pub fn resolve(&self, kind: EntityKind) -> &dyn Reportable {
        match kind {
            EntityKind::User => self.users.as_ref(),
            EntityKind::Comment => self.comments.as_ref(),
        }
    }
}
