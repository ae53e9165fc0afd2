// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Extension;
use migration::{Migrator, MigratorTrait};
use notifyrs::application::use_cases::record_login::RecordLoginUseCase;
use notifyrs::application::use_cases::report_content::ReportContentUseCase;
use notifyrs::channels::discord::DiscordChannel;
use notifyrs::channels::email::ResendEmailChannel;
use notifyrs::channels::slack::SlackChannel;
use notifyrs::config::settings::Settings;
use notifyrs::dispatch::Dispatcher;
use notifyrs::domain::registry::EntityRegistry;
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
use notifyrs::utils::telemetry;
use notifyrs::workers::manager::WorkerManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting notifyrs...");

    // Initialize Prometheus Metrics
    notifyrs::infrastructure::observability::metrics::init_metrics();

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let comment_repo = Arc::new(CommentRepositoryImpl::new(db.clone()));
    let report_repo = Arc::new(ReportRepositoryImpl::new(db.clone()));

    let queue = Arc::new(DatabaseJobQueue::new(job_repo.clone()));

    // 5. Initialize channels and the dispatch layer
    let email_channel = Arc::new(ResendEmailChannel::new(&settings.email));
    let slack_channel = Arc::new(SlackChannel::new(&settings.slack));
    let discord_channel = Arc::new(DiscordChannel::new(&settings.discord));
    let dispatcher = Arc::new(Dispatcher::new(
        email_channel,
        slack_channel,
        discord_channel,
        settings.email.clone(),
        settings.slack.clone(),
        settings.discord.clone(),
        &settings.retry,
    ));

    // 6. Start the scheduler maintenance loop
    let scheduler = Arc::new(JobScheduler::new(job_repo.clone()));
    let _maintenance = scheduler.start();

    // 7. Wire the trigger observer and use cases
    let trigger = Arc::new(ReengagementTrigger::new(
        scheduler.clone(),
        settings.reengagement.delay_days,
    ));
    let record_login = Arc::new(RecordLoginUseCase::new(
        user_repo.clone() as Arc<dyn UserRepository>,
        trigger,
    ));

    let registry = Arc::new(EntityRegistry::new(user_repo.clone(), comment_repo.clone()));
    let report_use_case = Arc::new(ReportContentUseCase::new(
        registry,
        report_repo.clone() as Arc<dyn ReportRepository>,
        user_repo.clone() as Arc<dyn UserRepository>,
        queue.clone() as Arc<dyn JobQueue>,
    ));

    // 8. Start workers
    let mut worker_manager = WorkerManager::new(
        queue.clone(),
        dispatcher.clone(),
        user_repo.clone() as Arc<dyn UserRepository>,
        settings.site_url(),
    );
    worker_manager.start_workers(settings.workers.count).await;

    // 9. Start HTTP server
    let app = routes::routes()
        .layer(Extension(queue))
        .layer(Extension(report_use_case))
        .layer(Extension(record_login))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            worker_manager.wait_for_shutdown().await;
        })
        .await?;

    Ok(())
}
