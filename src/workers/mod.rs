// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作管理器
pub mod manager;

/// 通知工作器
pub mod notification_worker;

/// Worker特质
pub mod worker;
