// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobKind};
use crate::domain::models::notification::{
    DiscordAnnouncement, EmailMessage, Embed, SlackMessage,
};
use crate::presentation::errors::AppError;
use crate::queue::job_queue::JobQueue;
use axum::{http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum NotificationPayload {
    Email(EmailBody),
    Slack(SlackBody),
    Discord(DiscordBody),
}

#[derive(Deserialize, Validate)]
pub struct EmailBody {
    #[validate(length(min = 1, message = "subject cannot be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "html body cannot be empty"))]
    pub html: String,
    #[validate(length(min = 1, message = "at least one recipient is required"))]
    pub recipients: Vec<String>,
}

#[derive(Deserialize, Validate)]
pub struct SlackBody {
    #[validate(length(min = 1, message = "text cannot be empty"))]
    pub text: String,
}

#[derive(Deserialize, Validate)]
pub struct DiscordBody {
    #[validate(length(min = 1, message = "content cannot be empty"))]
    pub content: String,
    pub embed: Option<Embed>,
}

/// 接受一条通知请求并入队
///
/// 任务落库即返回 202，投递结果不在请求内等待。
pub async fn create_notification<Q: JobQueue + 'static>(
    Extension(queue): Extension<Arc<Q>>,
    Json(payload): Json<NotificationPayload>,
) -> Result<StatusCode, AppError> {
    let job = match payload {
        NotificationPayload::Email(body) => {
            body.validate()?;
            let message = EmailMessage {
                subject: body.subject,
                html: body.html,
                recipients: body.recipients,
            };
            Job::new(JobKind::Email, json!(message))
        }
        NotificationPayload::Slack(body) => {
            body.validate()?;
            let message = SlackMessage { text: body.text };
            Job::new(JobKind::Slack, json!(message))
        }
        NotificationPayload::Discord(body) => {
            body.validate()?;
            let announcement = DiscordAnnouncement {
                content: Some(body.content),
                embed: body.embed,
            };
            Job::new(JobKind::Discord, json!(announcement))
        }
    };

    queue.enqueue(job).await?;
    Ok(StatusCode::ACCEPTED)
}
