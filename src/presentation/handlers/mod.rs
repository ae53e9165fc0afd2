// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 通知入队处理器
pub mod notification_handler;

/// 举报处理器
pub mod report_handler;

/// 用户处理器
pub mod user_handler;
