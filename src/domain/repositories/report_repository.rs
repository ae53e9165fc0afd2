// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::report::{EntityKind, Report};
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 举报仓库特质
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// 创建举报记录
    async fn create(&self, report: &Report) -> Result<Report, RepositoryError>;
    /// 根据ID查找举报记录
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>, RepositoryError>;
    /// 统计某实体收到的举报数量
    async fn count_for_entity(
        &self,
        entity_kind: EntityKind,
        entity_id: Uuid,
    ) -> Result<u64, RepositoryError>;
}
