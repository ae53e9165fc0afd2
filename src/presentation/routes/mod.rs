// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use crate::presentation::handlers::{notification_handler, report_handler, user_handler};
use crate::queue::job_queue::DatabaseJobQueue;
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/v1/reports", post(report_handler::create_report))
        .route("/v1/reports/count", get(report_handler::reports_count))
        .route(
            "/v1/moderation/deactivate",
            post(report_handler::deactivate_entity),
        )
        .route(
            "/v1/notifications",
            post(
                notification_handler::create_notification::<DatabaseJobQueue<JobRepositoryImpl>>,
            ),
        )
        .route(
            "/v1/users/{id}/login",
            post(user_handler::record_login::<JobRepositoryImpl>),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
