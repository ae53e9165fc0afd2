// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::create_test_app;
use chrono::{Duration, Utc};
use notifyrs::domain::models::job::{JobKind, JobStatus};
use notifyrs::domain::repositories::job_repository::JobRepository;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_repeated_dedup_schedules_leave_single_pending_job() {
    let app = create_test_app().await;

    for i in 0..4 {
        app.scheduler
            .schedule_deduped(
                "we_miss_you_42",
                JobKind::ReengagementEmail,
                json!({ "attempt": i }),
                Duration::days(7),
            )
            .await
            .unwrap();
    }

    let pending = app
        .job_repo
        .find_pending_by_lock_key("we_miss_you_42")
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payload, json!({ "attempt": 3 }));
}

#[tokio::test]
async fn test_dedup_cancels_previous_job_and_creates_new_one() {
    let app = create_test_app().await;

    let first = app
        .scheduler
        .schedule_deduped("key-1", JobKind::Email, json!({}), Duration::hours(1))
        .await
        .unwrap();
    let second = app
        .scheduler
        .schedule_deduped("key-1", JobKind::Email, json!({}), Duration::hours(1))
        .await
        .unwrap();

    let first = app.job_repo.find_by_id(first.id).await.unwrap().unwrap();
    let second = app.job_repo.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(first.status, JobStatus::Cancelled);
    assert!(first.completed_at.is_some());
    assert_eq!(second.status, JobStatus::Pending);
}

#[tokio::test]
async fn test_rescheduling_replaces_payload_and_delay() {
    let app = create_test_app().await;

    app.scheduler
        .schedule_deduped("key-2", JobKind::Email, json!("A"), Duration::days(10))
        .await
        .unwrap();
    app.scheduler
        .schedule_deduped("key-2", JobKind::Email, json!("B"), Duration::days(5))
        .await
        .unwrap();

    let pending = app
        .job_repo
        .find_pending_by_lock_key("key-2")
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payload, json!("B"));

    let scheduled_at = pending[0].scheduled_at.unwrap();
    let lower = Utc::now() + Duration::days(4);
    let upper = Utc::now() + Duration::days(6);
    assert!(scheduled_at > lower && scheduled_at < upper);
}

#[tokio::test]
async fn test_dedup_keys_are_independent() {
    let app = create_test_app().await;

    app.scheduler
        .schedule_deduped("key-a", JobKind::Email, json!({}), Duration::hours(1))
        .await
        .unwrap();
    app.scheduler
        .schedule_deduped("key-b", JobKind::Email, json!({}), Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(
        app.job_repo
            .find_pending_by_lock_key("key-a")
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        app.job_repo
            .find_pending_by_lock_key("key-b")
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_schedule_in_creates_plain_delayed_job() {
    let app = create_test_app().await;

    let job = app
        .scheduler
        .schedule_in(JobKind::Slack, json!({"text": "hi"}), Duration::minutes(30))
        .await
        .unwrap();

    let stored = app.job_repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Pending);
    assert!(stored.lock_key.is_none());
    assert!(stored.scheduled_at.is_some());
}

#[tokio::test]
async fn test_acquire_skips_future_jobs_and_claims_due_ones() {
    let app = create_test_app().await;
    let worker_id = Uuid::new_v4();

    app.scheduler
        .schedule_in(JobKind::Email, json!({}), Duration::hours(1))
        .await
        .unwrap();
    assert!(app.job_repo.acquire_next(worker_id).await.unwrap().is_none());

    let due = app
        .scheduler
        .schedule_at(JobKind::Email, json!({}), Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    let claimed = app
        .job_repo
        .acquire_next(worker_id)
        .await
        .unwrap()
        .expect("due job should be claimed");

    assert_eq!(claimed.id, due.id);
    assert_eq!(claimed.status, JobStatus::Running);
    assert_eq!(claimed.lock_token, Some(worker_id));
    assert!(claimed.lock_expires_at.is_some());
}

#[tokio::test]
async fn test_claimed_job_cannot_be_cancelled() {
    let app = create_test_app().await;

    let job = app
        .scheduler
        .schedule_at(JobKind::Email, json!({}), Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    app.job_repo.acquire_next(Uuid::new_v4()).await.unwrap();

    // Race lost: the runner got there first
    assert!(!app.job_repo.cancel_pending(job.id).await.unwrap());
    let stored = app.job_repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Running);
}

#[tokio::test]
async fn test_expired_lease_is_reset_to_pending() {
    let app = create_test_app().await;

    let job = app
        .scheduler
        .schedule_at(JobKind::Email, json!({}), Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    let mut claimed = app
        .job_repo
        .acquire_next(Uuid::new_v4())
        .await
        .unwrap()
        .unwrap();

    // Simulate a worker that died mid-job
    claimed.lock_expires_at = Some((Utc::now() - Duration::minutes(1)).into());
    app.job_repo.update(&claimed).await.unwrap();

    let reset = app
        .job_repo
        .reset_stuck_jobs(Duration::minutes(5))
        .await
        .unwrap();
    assert_eq!(reset, 1);

    let stored = app.job_repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Pending);
    assert!(stored.lock_token.is_none());
}
