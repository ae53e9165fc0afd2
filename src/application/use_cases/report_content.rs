// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::emails::render_report_confirmation;
use crate::application::use_cases::UseCaseError;
use crate::domain::models::job::{Job, JobKind};
use crate::domain::models::report::{EntityKind, Report};
use crate::domain::registry::EntityRegistry;
use crate::domain::repositories::report_repository::ReportRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::queue::job_queue::JobQueue;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// 举报用例
///
/// 举报创建分两步：先落库拿到举报编号，再入队包含该编号的
/// 确认邮件任务。确认邮件是尽力而为的，入队或投递失败都
/// 不会回滚已创建的举报。
pub struct ReportContentUseCase {
    /// 实体类型注册表
    registry: Arc<EntityRegistry>,
    /// 举报仓库
    reports: Arc<dyn ReportRepository>,
    /// 用户仓库
    users: Arc<dyn UserRepository>,
    /// 任务队列
    queue: Arc<dyn JobQueue>,
}

impl ReportContentUseCase {
    /// 创建新的举报用例实例
    ///
    /// # 参数
    ///
    /// * `registry` - 实体类型注册表
    /// * `reports` - 举报仓库
    /// * `users` - 用户仓库
    /// * `queue` - 任务队列
    pub fn new(
        registry: Arc<EntityRegistry>,
        reports: Arc<dyn ReportRepository>,
        users: Arc<dyn UserRepository>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            registry,
            reports,
            users,
            queue,
        }
    }

    /// 创建一条举报
    ///
    /// # 参数
    ///
    /// * `entity_kind` - 被举报实体的类型
    /// * `entity_id` - 被举报实体的ID
    /// * `reporter_id` - 举报人ID
    /// * `reason` - 举报原因
    ///
    /// # 返回值
    ///
    /// * `Ok(Report)` - 创建成功的举报记录
    /// * `Err(UseCaseError)` - 实体或举报人不存在，或存储失败
    pub async fn report(
        &self,
        entity_kind: EntityKind,
        entity_id: Uuid,
        reporter_id: Uuid,
        reason: String,
    ) -> Result<Report, UseCaseError> {
        let entity = self.registry.resolve(entity_kind);
        if !entity.exists(entity_id).await? {
            return Err(UseCaseError::EntityNotFound(entity_kind, entity_id));
        }

        let reporter = self
            .users
            .find_by_id(reporter_id)
            .await?
            .ok_or(UseCaseError::ReporterNotFound(reporter_id))?;

        let report = Report::new(entity_kind, entity_id, reporter_id, reason);
        let report = self.reports.create(&report).await?;
        info!(
            "Report {} created against {} {}",
            report.id, entity_kind, entity_id
        );

        // 确认邮件在举报落库后入队，入队失败不回滚举报
        let email = render_report_confirmation(&reporter, &report);
        let job = Job::new(JobKind::Email, json!(email));
        if let Err(e) = self.queue.enqueue(job).await {
            error!(
                "Failed to enqueue confirmation email for report {}: {}",
                report.id, e
            );
        }

        Ok(report)
    }

    /// 统计某实体收到的举报数量
    pub async fn reports_count(
        &self,
        entity_kind: EntityKind,
        entity_id: Uuid,
    ) -> Result<u64, UseCaseError> {
        let count = self.reports.count_for_entity(entity_kind, entity_id).await?;
        Ok(count)
    }

    /// 审核处置：下架被举报的实体
    ///
    /// 独立的管理员操作，与举报创建解耦。
    pub async fn deactivate(
        &self,
        entity_kind: EntityKind,
        entity_id: Uuid,
    ) -> Result<(), UseCaseError> {
        self.registry
            .resolve(entity_kind)
            .deactivate(entity_id)
            .await?;
        info!("Deactivated {} {}", entity_kind, entity_id);
        Ok(())
    }
}
