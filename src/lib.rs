// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含邮件内容渲染和应用用例
pub mod application;

/// 渠道模块
///
/// 各通知服务方的适配器：邮件、Slack、Discord
pub mod channels;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 调度策略模块
///
/// 渠道开关、调试改写与有界重试
pub mod dispatch;

/// 领域模块
///
/// 包含核心业务实体和仓库接口
pub mod domain;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库和可观测性
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 队列模块
///
/// 实现任务队列和去重调度功能
pub mod queue;

/// 触发器模块
///
/// 监视实体字段变更并调度召回任务
pub mod triggers;

/// 工具模块
///
/// 提供错误类型、重试策略和遥测初始化
pub mod utils;

/// 工作器模块
///
/// 实现后台任务处理和工作器管理
pub mod workers;
