// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Discord渠道适配器
pub mod discord;

/// 邮件渠道适配器
pub mod email;

/// Slack渠道适配器
pub mod slack;

/// 渠道适配器特质
pub mod traits;
