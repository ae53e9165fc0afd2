// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 任务模型
pub mod job;

/// 通知请求与富消息结构
pub mod notification;

/// 举报模型与实体类型注册
pub mod report;

/// 用户与评论实体
pub mod user;
