// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::report_content::ReportContentUseCase;
use crate::domain::models::report::{EntityKind, Report};
use crate::presentation::errors::AppError;
use axum::extract::Query;
use axum::{http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct CreateReportPayload {
    pub entity_type: EntityKind,
    pub entity_id: Uuid,
    pub reporter_id: Uuid,
    #[validate(length(min = 1, message = "reason cannot be empty"))]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct ReportCountQuery {
    pub entity_type: EntityKind,
    pub entity_id: Uuid,
}

#[derive(Deserialize)]
pub struct DeactivatePayload {
    pub entity_type: EntityKind,
    pub entity_id: Uuid,
}

pub async fn create_report(
    Extension(use_case): Extension<Arc<ReportContentUseCase>>,
    Json(payload): Json<CreateReportPayload>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    payload.validate()?;

    let report = use_case
        .report(
            payload.entity_type,
            payload.entity_id,
            payload.reporter_id,
            payload.reason,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn reports_count(
    Extension(use_case): Extension<Arc<ReportContentUseCase>>,
    Query(query): Query<ReportCountQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = use_case
        .reports_count(query.entity_type, query.entity_id)
        .await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn deactivate_entity(
    Extension(use_case): Extension<Arc<ReportContentUseCase>>,
    Json(payload): Json<DeactivatePayload>,
) -> Result<StatusCode, AppError> {
    use_case
        .deactivate(payload.entity_type, payload.entity_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
