// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::report::EntityKind;
use crate::domain::repositories::job_repository::RepositoryError;
use crate::queue::job_queue::QueueError;
use thiserror::Error;
use uuid::Uuid;

/// 登录记录用例
pub mod record_login;

/// 举报用例
pub mod report_content;

/// 用例错误类型
#[derive(Error, Debug)]
pub enum UseCaseError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// 队列错误
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// 被举报实体不存在
    #[error("Entity not found: {0} {1}")]
    EntityNotFound(EntityKind, Uuid),

    /// 举报人不存在
    #[error("Reporter not found: {0}")]
    ReporterNotFound(Uuid),
}
