// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::record_login::RecordLoginUseCase;
use crate::domain::repositories::job_repository::JobRepository;
use crate::presentation::errors::AppError;
use axum::extract::Path;
use axum::{http::StatusCode, Extension};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// 记录一次用户登录
///
/// 更新 `last_login_at` 并让触发观察器据此重置召回计时。
pub async fn record_login<R: JobRepository + Send + Sync + 'static>(
    Extension(use_case): Extension<Arc<RecordLoginUseCase<R>>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    use_case.record_login(user_id, Utc::now().into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
