// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::Extension;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use notifyrs::application::use_cases::record_login::RecordLoginUseCase;
use notifyrs::application::use_cases::report_content::ReportContentUseCase;
use notifyrs::channels::traits::{DiscordSender, EmailSender, SlackSender};
use notifyrs::config::settings::{
    DatabaseSettings, DiscordSettings, EmailSettings, RetrySettings, SlackSettings,
};
use notifyrs::dispatch::Dispatcher;
use notifyrs::domain::models::notification::{EmailMessage, Embed, SlackMessage};
use notifyrs::domain::models::user::{Comment, User};
use notifyrs::domain::registry::EntityRegistry;
use notifyrs::domain::repositories::comment_repository::CommentRepository;
use notifyrs::domain::repositories::report_repository::ReportRepository;
use notifyrs::domain::repositories::user_repository::UserRepository;
use notifyrs::infrastructure::database::connection;
use notifyrs::infrastructure::repositories::comment_repo_impl::CommentRepositoryImpl;
use notifyrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use notifyrs::infrastructure::repositories::report_repo_impl::ReportRepositoryImpl;
use notifyrs::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use notifyrs::presentation::routes;
use notifyrs::queue::job_queue::{DatabaseJobQueue, JobQueue};
use notifyrs::queue::scheduler::JobScheduler;
use notifyrs::triggers::ReengagementTrigger;
use notifyrs::utils::errors::DeliveryError;
use notifyrs::workers::notification_worker::NotificationWorker;
use notifyrs::workers::worker::Worker;
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 记录式邮件发送器，可配置前若干次调用失败
#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub attempts: AtomicU32,
    pub failures_before_success: AtomicU32,
    pub fatal: Mutex<Option<String>>,
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self.fatal.lock().clone() {
            return Err(DeliveryError::Auth(reason));
        }

        if self
            .failures_before_success
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DeliveryError::Transport("connection reset".into()));
        }

        self.sent.lock().push(message.clone());
        Ok(())
    }
}

/// 记录式Slack发送器
#[derive(Default)]
pub struct RecordingSlackSender {
    pub sent: Mutex<Vec<(String, SlackMessage)>>,
}

#[async_trait]
impl SlackSender for RecordingSlackSender {
    async fn post(&self, channel: &str, message: &SlackMessage) -> Result<(), DeliveryError> {
        self.sent.lock().push((channel.to_string(), message.clone()));
        Ok(())
    }
}

/// 记录式Discord发送器
#[derive(Default)]
pub struct RecordingDiscordSender {
    pub announcements: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl DiscordSender for RecordingDiscordSender {
    async fn announce(&self, content: Option<&str>, _embed: Option<&Embed>) -> bool {
        self.announcements.lock().push(content.map(String::from));
        true
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub job_repo: Arc<JobRepositoryImpl>,
    pub user_repo: Arc<UserRepositoryImpl>,
    pub comment_repo: Arc<CommentRepositoryImpl>,
    pub report_repo: Arc<ReportRepositoryImpl>,
    pub queue: Arc<DatabaseJobQueue<JobRepositoryImpl>>,
    pub scheduler: Arc<JobScheduler<JobRepositoryImpl>>,
    pub trigger: Arc<ReengagementTrigger<JobRepositoryImpl>>,
    pub dispatcher: Arc<Dispatcher>,
    pub email_sender: Arc<RecordingEmailSender>,
    pub slack_sender: Arc<RecordingSlackSender>,
    pub discord_sender: Arc<RecordingDiscordSender>,
}

pub fn test_email_settings() -> EmailSettings {
    EmailSettings {
        enabled: true,
        api_key: "re_test_key".into(),
        from_address: "noreply@example.com".into(),
        debug: false,
        sink_address: "delivered@resend.dev".into(),
    }
}

pub fn test_slack_settings() -> SlackSettings {
    SlackSettings {
        enabled: true,
        bot_token: "xoxb-test".into(),
        default_channel: "#general".into(),
    }
}

pub fn test_discord_settings() -> DiscordSettings {
    DiscordSettings {
        enabled: true,
        bot_token: "0123456789012345678901234567890123456789012345678901234".into(),
        announcement_channel_id: Some("42".into()),
    }
}

pub fn test_retry_settings() -> RetrySettings {
    RetrySettings {
        max_attempts: 3,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
    }
}

pub async fn create_test_app() -> TestApp {
    // In-memory sqlite lives per-connection, so the pool must stay at one
    let db_settings = DatabaseSettings {
        url: "sqlite::memory:".into(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
    };

    let db = Arc::new(
        connection::create_pool(&db_settings)
            .await
            .expect("Failed to open sqlite database"),
    );
    Migrator::up(db.as_ref(), None).await.unwrap();

    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let comment_repo = Arc::new(CommentRepositoryImpl::new(db.clone()));
    let report_repo = Arc::new(ReportRepositoryImpl::new(db.clone()));

    let queue = Arc::new(DatabaseJobQueue::new(job_repo.clone()));
    let scheduler = Arc::new(JobScheduler::new(job_repo.clone()));
    let trigger = Arc::new(ReengagementTrigger::new(scheduler.clone(), 7));

    let email_sender = Arc::new(RecordingEmailSender::default());
    let slack_sender = Arc::new(RecordingSlackSender::default());
    let discord_sender = Arc::new(RecordingDiscordSender::default());
    let dispatcher = Arc::new(Dispatcher::new(
        email_sender.clone(),
        slack_sender.clone(),
        discord_sender.clone(),
        test_email_settings(),
        test_slack_settings(),
        test_discord_settings(),
        &test_retry_settings(),
    ));

    let record_login = Arc::new(RecordLoginUseCase::new(
        user_repo.clone() as Arc<dyn UserRepository>,
        trigger.clone(),
    ));

    let registry = Arc::new(EntityRegistry::new(user_repo.clone(), comment_repo.clone()));
    let report_use_case = Arc::new(ReportContentUseCase::new(
        registry,
        report_repo.clone() as Arc<dyn ReportRepository>,
        user_repo.clone() as Arc<dyn UserRepository>,
        queue.clone() as Arc<dyn JobQueue>,
    ));

    let app = routes::routes()
        .layer(Extension(queue.clone()))
        .layer(Extension(report_use_case))
        .layer(Extension(record_login));

    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        db,
        job_repo,
        user_repo,
        comment_repo,
        report_repo,
        queue,
        scheduler,
        trigger,
        dispatcher,
        email_sender,
        slack_sender,
        discord_sender,
    }
}

impl TestApp {
    /// 在后台启动一个通知工作器
    pub fn spawn_worker(&self) -> JoinHandle<()> {
        let worker = NotificationWorker::new(
            self.queue.clone(),
            self.dispatcher.clone(),
            self.user_repo.clone() as Arc<dyn UserRepository>,
            "https://test.example.com".into(),
        );

        tokio::spawn(async move {
            let _ = worker.run().await;
        })
    }

    /// 插入一个激活用户
    pub async fn insert_user(&self, email: &str, first_name: &str) -> User {
        let user = User::new(email.to_string(), Some(first_name.to_string()));
        self.user_repo.create(&user).await.unwrap()
    }

    /// 插入一条评论
    pub async fn insert_comment(&self, author: &User, body: &str) -> Comment {
        let comment = Comment::new(author.id, body.to_string());
        self.comment_repo.create(&comment).await.unwrap()
    }
}
