// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::report::{EntityKind, Report};
use crate::domain::repositories::job_repository::RepositoryError;
use crate::domain::repositories::report_repository::ReportRepository;
use crate::infrastructure::database::entities::report as report_entity;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 举报仓库实现
#[derive(Clone)]
pub struct ReportRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ReportRepositoryImpl {
    /// 创建新的举报仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<report_entity::Model> for Report {
    fn from(model: report_entity::Model) -> Self {
        Self {
            id: model.id,
            entity_kind: model.entity_kind.parse().unwrap_or(EntityKind::User),
            entity_id: model.entity_id,
            reporter_id: model.reporter_id,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

impl From<Report> for report_entity::ActiveModel {
    fn from(report: Report) -> Self {
        Self {
            id: Set(report.id),
            entity_kind: Set(report.entity_kind.to_string()),
            entity_id: Set(report.entity_id),
            reporter_id: Set(report.reporter_id),
            reason: Set(report.reason.clone()),
            created_at: Set(report.created_at),
        }
    }
}

#[async_trait]
impl ReportRepository for ReportRepositoryImpl {
    async fn create(&self, report: &Report) -> Result<Report, RepositoryError> {
        let model: report_entity::ActiveModel = report.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(report.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>, RepositoryError> {
        let model = report_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn count_for_entity(
        &self,
        entity_kind: EntityKind,
        entity_id: Uuid,
    ) -> Result<u64, RepositoryError> {
        let count = report_entity::Entity::find()
            .filter(report_entity::Column::EntityKind.eq(entity_kind.to_string()))
            .filter(report_entity::Column::EntityId.eq(entity_id))
            .count(self.db.as_ref())
            .await?;

        Ok(count)
    }
}
