// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::UseCaseError;
use crate::domain::repositories::job_repository::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            match self.0.downcast_ref::<UseCaseError>() {
                Some(UseCaseError::EntityNotFound(_, _))
                | Some(UseCaseError::ReporterNotFound(_))
                | Some(UseCaseError::Repository(RepositoryError::NotFound)) => {
                    StatusCode::NOT_FOUND
                }
                Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
                None => match self.0.downcast_ref::<RepositoryError>() {
                    Some(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                    Some(RepositoryError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                    None => StatusCode::INTERNAL_SERVER_ERROR,
                },
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
