// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobStatus};
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::infrastructure::database::entities::job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层。取消与拉取都使用
/// 条件更新（status 守卫）实现乐观声明，同一套代码在
/// Postgres 与 SQLite 后端上行为一致。
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for Job {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            job_type: model.job_type.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            lock_key: model.lock_key,
            payload: model.payload,
            scheduled_at: model.scheduled_at,
            created_at: model.created_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            updated_at: model.updated_at,
            lock_token: model.lock_token,
            lock_expires_at: model.lock_expires_at,
            error_message: model.error_message,
        }
    }
}

impl From<Job> for job_entity::ActiveModel {
    fn from(job: Job) -> Self {
        Self {
            id: Set(job.id),
            job_type: Set(job.job_type.to_string()),
            status: Set(job.status.to_string()),
            lock_key: Set(job.lock_key.clone()),
            payload: Set(job.payload.clone()),
            scheduled_at: Set(job.scheduled_at),
            created_at: Set(job.created_at),
            started_at: Set(job.started_at),
            completed_at: Set(job.completed_at),
            updated_at: Set(job.updated_at),
            lock_token: Set(job.lock_token),
            lock_expires_at: Set(job.lock_expires_at),
            error_message: Set(job.error_message.clone()),
        }
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(&self, job: &Job) -> Result<Job, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, job: &Job) -> Result<Job, RepositoryError> {
        let mut model: job_entity::ActiveModel = job.clone().into();

        model.updated_at = Set(Utc::now().into());

        let updated_model = model.update(self.db.as_ref()).await?;
        Ok(updated_model.into())
    }

    async fn find_pending_by_lock_key(&self, lock_key: &str) -> Result<Vec<Job>, RepositoryError> {
        let models = job_entity::Entity::find()
            .filter(job_entity::Column::LockKey.eq(lock_key))
            .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string()))
            .order_by_asc(job_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Job::from).collect())
    }

    async fn cancel_pending(&self, id: Uuid) -> Result<bool, RepositoryError> {
        // 条件更新：只有仍处于 Pending 的任务会被取消。
        // rows_affected == 0 表示任务已被 Worker 拉走，竞争失败。
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Cancelled.to_string()),
            )
            .col_expr(
                job_entity::Column::CompletedAt,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(Utc::now().into())),
            )
            .col_expr(
                job_entity::Column::UpdatedAt,
                Expr::value::<DateTime<FixedOffset>>(Utc::now().into()),
            )
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn acquire_next(&self, worker_id: Uuid) -> Result<Option<Job>, RepositoryError> {
        let candidate = job_entity::Entity::find()
            .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string()))
            .filter(
                Condition::any()
                    .add(job_entity::Column::ScheduledAt.is_null())
                    .add(job_entity::Column::ScheduledAt.lte(Utc::now())),
            )
            .order_by_asc(job_entity::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?;

        let Some(model) = candidate else {
            return Ok(None);
        };

        // 乐观声明执行权：status 守卫保证同一任务只有一个 Worker 赢得租约
        let claimed = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Running.to_string()),
            )
            .col_expr(
                job_entity::Column::LockToken,
                Expr::value(Some(worker_id)),
            )
            .col_expr(
                job_entity::Column::LockExpiresAt,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(
                    (Utc::now() + Duration::minutes(5)).into(),
                )),
            )
            .col_expr(
                job_entity::Column::StartedAt,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(Utc::now().into())),
            )
            .col_expr(
                job_entity::Column::UpdatedAt,
                Expr::value::<DateTime<FixedOffset>>(Utc::now().into()),
            )
            .filter(job_entity::Column::Id.eq(model.id))
            .filter(job_entity::Column::Status.eq(JobStatus::Pending.to_string()))
            .exec(self.db.as_ref())
            .await?;

        if claimed.rows_affected == 0 {
            // 被其它 Worker 抢先或刚被取消，下一轮轮询再试
            return Ok(None);
        }

        self.find_by_id(model.id).await
    }

    async fn mark_done(&self, id: Uuid) -> Result<(), RepositoryError> {
        let job = self
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut updated_job = job.clone();
        updated_job.status = JobStatus::Done;
        updated_job.completed_at = Some(Utc::now().into());
        self.update(&updated_job).await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: Option<String>) -> Result<(), RepositoryError> {
        let job = self
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut updated_job = job.clone();
        updated_job.status = JobStatus::Failed;
        updated_job.completed_at = Some(Utc::now().into());
        updated_job.error_message = error;
        self.update(&updated_job).await?;
        Ok(())
    }

    async fn reset_stuck_jobs(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError> {
        let threshold = Utc::now() - timeout;

        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Pending.to_string()),
            )
            .col_expr(
                job_entity::Column::LockToken,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                job_entity::Column::LockExpiresAt,
                Expr::value(Option::<DateTime<FixedOffset>>::None),
            )
            .col_expr(
                job_entity::Column::StartedAt,
                Expr::value(Option::<DateTime<FixedOffset>>::None),
            )
            .filter(job_entity::Column::Status.eq(JobStatus::Running.to_string()))
            .filter(
                Condition::any()
                    .add(job_entity::Column::LockExpiresAt.lte(Utc::now()))
                    .add(
                        Condition::all()
                            .add(job_entity::Column::LockExpiresAt.is_null())
                            .add(job_entity::Column::StartedAt.lte(threshold)),
                    ),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}
