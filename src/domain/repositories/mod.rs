// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 评论仓库接口
pub mod comment_repository;

/// 任务仓库接口
pub mod job_repository;

/// 举报仓库接口
pub mod report_repository;

/// 用户仓库接口
pub mod user_repository;
