// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{create_test_app, TestApp};
use chrono::Utc;
use notifyrs::domain::models::job::{Job, JobKind, JobStatus};
use notifyrs::domain::repositories::job_repository::JobRepository;
use notifyrs::domain::repositories::user_repository::UserRepository;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Duration;
use uuid::Uuid;

/// 轮询等待任务进入终态
async fn wait_for_terminal(app: &TestApp, job_id: Uuid) -> Job {
    for _ in 0..100 {
        let job = app.job_repo.find_by_id(job_id).await.unwrap().unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("job {} never reached a terminal state", job_id);
}

#[tokio::test]
async fn test_email_job_is_delivered_and_marked_done() {
    let app = create_test_app().await;

    let job = Job::new(
        JobKind::Email,
        json!({
            "subject": "Hello",
            "html": "<p>Hi</p>",
            "recipients": ["user@example.com"],
        }),
    );
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Done);
    let sent = app.email_sender.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Hello");
}

#[tokio::test]
async fn test_slack_job_is_delivered_to_default_channel() {
    let app = create_test_app().await;

    let job = Job::new(JobKind::Slack, json!({ "text": "deploy finished" }));
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Done);
    let sent = app.slack_sender.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "#general");
    assert_eq!(sent[0].1.text, "deploy finished");
}

#[tokio::test]
async fn test_discord_job_delivers_announcement() {
    let app = create_test_app().await;

    let job = Job::new(JobKind::Discord, json!({ "content": "v1.2 is out", "embed": null }));
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Done);
    let announcements = app.discord_sender.announcements.lock();
    assert_eq!(announcements.len(), 1);
    assert_eq!(announcements[0].as_deref(), Some("v1.2 is out"));
}

#[tokio::test]
async fn test_reengagement_job_sends_we_miss_you_email() {
    let app = create_test_app().await;
    let user = app.insert_user("ada@example.com", "Ada").await;

    let job = Job::new(JobKind::ReengagementEmail, json!({ "user_id": user.id }));
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Done);
    let sent = app.email_sender.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "We miss you! Come back and see what's new");
    assert_eq!(sent[0].recipients, vec!["ada@example.com".to_string()]);
    assert!(sent[0].html.contains("https://test.example.com"));
}

#[tokio::test]
async fn test_reengagement_job_skips_deactivated_user() {
    let app = create_test_app().await;
    let user = app.insert_user("gone@example.com", "Gone").await;
    app.user_repo.deactivate(user.id).await.unwrap();

    let job = Job::new(JobKind::ReengagementEmail, json!({ "user_id": user.id }));
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    // Ineligible target: the job completes quietly without an email
    assert_eq!(finished.status, JobStatus::Done);
    assert!(finished.error_message.is_none());
    assert!(app.email_sender.sent.lock().is_empty());
}

#[tokio::test]
async fn test_reengagement_job_skips_missing_user() {
    let app = create_test_app().await;

    let job = Job::new(JobKind::ReengagementEmail, json!({ "user_id": Uuid::new_v4() }));
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Done);
    assert!(app.email_sender.sent.lock().is_empty());
}

#[tokio::test]
async fn test_fatal_delivery_error_marks_job_failed() {
    let app = create_test_app().await;
    *app.email_sender.fatal.lock() = Some("invalid api key".into());

    let job = Job::new(
        JobKind::Email,
        json!({
            "subject": "Hello",
            "html": "<p>Hi</p>",
            "recipients": ["user@example.com"],
        }),
    );
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Failed);
    let message = finished.error_message.unwrap();
    assert!(message.contains("invalid api key"));
    // Auth errors are not retried
    assert_eq!(app.email_sender.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_failures_are_retried_within_the_job() {
    let app = create_test_app().await;
    app.email_sender
        .failures_before_success
        .store(2, Ordering::SeqCst);

    let job = Job::new(
        JobKind::Email,
        json!({
            "subject": "Hello",
            "html": "<p>Hi</p>",
            "recipients": ["user@example.com"],
        }),
    );
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Done);
    assert_eq!(app.email_sender.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(app.email_sender.sent.lock().len(), 1);
}

#[tokio::test]
async fn test_undecodable_payload_marks_job_failed() {
    let app = create_test_app().await;

    let job = Job::new(JobKind::Email, json!({ "not": "an email" }));
    let job = app.job_repo.create(&job).await.unwrap();

    let handle = app.spawn_worker();
    let finished = wait_for_terminal(&app, job.id).await;
    handle.abort();

    assert_eq!(finished.status, JobStatus::Failed);
    assert!(finished.error_message.is_some());
    assert!(app.email_sender.sent.lock().is_empty());
}

#[tokio::test]
async fn test_trigger_resets_timer_on_each_login() {
    let app = create_test_app().await;
    let user = app.insert_user("busy@example.com", "Busy").await;

    let first = app
        .trigger
        .on_user_saved(
            user.id,
            false,
            &notifyrs::triggers::FieldTransition {
                old: None,
                new: Some(Utc::now().into()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    let second = app
        .trigger
        .on_user_saved(
            user.id,
            false,
            &notifyrs::triggers::FieldTransition {
                old: Some(Utc::now().into()),
                new: Some((Utc::now() + chrono::Duration::seconds(5)).into()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    let pending = app
        .job_repo
        .find_pending_by_lock_key(&format!("we_miss_you_{}", user.id))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    let stale = app.job_repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stale.status, JobStatus::Cancelled);
}
