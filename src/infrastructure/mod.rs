// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库基础设施
pub mod database;

/// 可观测性基础设施
pub mod observability;

/// 仓库实现
pub mod repositories;
