// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::dispatch::Dispatcher;
use crate::domain::repositories::user_repository::UserRepository;
use crate::queue::job_queue::JobQueue;
use crate::workers::notification_worker::NotificationWorker;
use crate::workers::worker::Worker;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
pub struct WorkerManager<Q: JobQueue + 'static> {
    queue: Arc<Q>,
    dispatcher: Arc<Dispatcher>,
    users: Arc<dyn UserRepository>,
    site_url: String,
    handles: Vec<JoinHandle<()>>,
}

impl<Q: JobQueue + 'static> WorkerManager<Q> {
    /// 创建新的工作管理器实例
    ///
    /// # 参数
    ///
    /// * `queue` - 任务队列
    /// * `dispatcher` - 调度策略层
    /// * `users` - 用户仓库
    /// * `site_url` - 站点URL，传递给召回邮件渲染
    pub fn new(
        queue: Arc<Q>,
        dispatcher: Arc<Dispatcher>,
        users: Arc<dyn UserRepository>,
        site_url: String,
    ) -> Self {
        Self {
            queue,
            dispatcher,
            users,
            site_url,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = NotificationWorker::new(
                self.queue.clone(),
                self.dispatcher.clone(),
                self.users.clone(),
                self.site_url.clone(),
            );

            let handle = tokio::spawn(async move {
                if let Err(e) = worker.run().await {
                    error!("Worker {} exited with error: {}", worker.name(), e);
                }
            });
            self.handles.push(handle);
        }

        info!("Started {} notification workers", count);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}
